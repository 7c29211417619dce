/// Bid command handling
/// 1. place bid
/// 2. buy now
///
/// Both take the whole auction collection and return a new one; nothing here
/// touches storage.
// region:    --- Imports
use crate::auction::events::AuctionEvent;
use crate::auction::model::{position, Auction, AuctionStatus, Bid, Winner, MAX_AMOUNT};
use crate::auction::AuctionError;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
// endregion: --- Imports

/// Bids landing this close to the end push the end out
pub const ANTI_SNIPE_MINUTES: i64 = 5;

// region:    --- Commands
/// Bid request; the bidder identity comes from the caller's session
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct PlaceBidCommand {
    pub bidder_id: String,
    pub bidder_name: String,
    pub amount: i64,
    #[serde(default)]
    pub is_vendor: bool,
}

/// Buy-now request
#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct BuyNowCommand {
    pub buyer_id: String,
    pub buyer_name: String,
    #[serde(default)]
    pub is_vendor: bool,
}

/// 1. Place bid
pub fn place_bid(
    auctions: &[Auction],
    auction_id: &str,
    cmd: &PlaceBidCommand,
    now: DateTime<Utc>,
) -> Result<(Vec<Auction>, AuctionEvent), AuctionError> {
    let index = position(auctions, auction_id)?;
    let auction = &auctions[index];

    // status and time checks
    if auction.status != AuctionStatus::Live {
        return Err(AuctionError::NotLive(auction.status));
    }
    if auction.has_expired(now) {
        return Err(AuctionError::Expired);
    }
    if auction.vendor_only && !cmd.is_vendor {
        return Err(AuctionError::VendorOnly);
    }

    if cmd.amount > MAX_AMOUNT {
        return Err(AuctionError::AmountOutOfRange {
            amount: cmd.amount,
            maximum: MAX_AMOUNT,
        });
    }
    let minimum = auction.minimum_next_bid();
    if cmd.amount < minimum {
        return Err(AuctionError::BidTooLow {
            amount: cmd.amount,
            minimum,
        });
    }

    let mut next = auctions.to_vec();
    let auction = &mut next[index];
    auction.bids.push(Bid {
        id: Uuid::new_v4().to_string(),
        bidder_id: cmd.bidder_id.clone(),
        bidder_name: cmd.bidder_name.clone(),
        amount: cmd.amount,
        time: now,
        is_vendor: cmd.is_vendor,
    });

    // anti-sniping: extend to now + window, never shorten
    let window = Duration::minutes(ANTI_SNIPE_MINUTES);
    let mut extended_to = None;
    if auction.ends_at - now <= window {
        let extended = auction.ends_at.max(now + window);
        if extended > auction.ends_at {
            auction.ends_at = extended;
            extended_to = Some(extended);
        }
    }

    let event = AuctionEvent::BidPlaced {
        auction_id: auction.id.clone(),
        bidder_id: cmd.bidder_id.clone(),
        bid_amount: cmd.amount,
        timestamp: now,
        extended_to,
    };
    Ok((next, event))
}

/// 2. Buy now
///
/// Returns the collection unchanged with no event when the auction has no
/// buy-now price, is not live, or has already run out of time. Vendor-only
/// auctions refuse other buyers the same way bids are refused.
pub fn buy_now(
    auctions: &[Auction],
    auction_id: &str,
    cmd: &BuyNowCommand,
    now: DateTime<Utc>,
) -> Result<(Vec<Auction>, Option<AuctionEvent>), AuctionError> {
    let index = position(auctions, auction_id)?;
    let auction = &auctions[index];

    if auction.vendor_only && !cmd.is_vendor {
        return Err(AuctionError::VendorOnly);
    }
    let price = match auction.buy_now_price {
        Some(price) if auction.status == AuctionStatus::Live && !auction.has_expired(now) => {
            price
        }
        _ => return Ok((auctions.to_vec(), None)),
    };

    let mut next = auctions.to_vec();
    let auction = &mut next[index];
    auction.status = AuctionStatus::Closed;
    auction.bids.push(Bid {
        id: Uuid::new_v4().to_string(),
        bidder_id: cmd.buyer_id.clone(),
        bidder_name: cmd.buyer_name.clone(),
        amount: price,
        time: now,
        is_vendor: cmd.is_vendor,
    });
    auction.winner = Some(Winner {
        bidder_id: cmd.buyer_id.clone(),
        bidder_name: cmd.buyer_name.clone(),
        amount: price,
        via_buy_now: true,
    });

    let event = AuctionEvent::BuyNowExecuted {
        auction_id: auction.id.clone(),
        buyer_id: cmd.buyer_id.clone(),
        price,
        timestamp: now,
    };
    Ok((next, Some(event)))
}

// endregion: --- Commands

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auction::model::{PublicAuction, MIN_INCREMENT};
    use chrono::TimeZone;

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap()
    }

    fn auction(ends_in: Duration) -> Auction {
        Auction {
            id: "a1".into(),
            seller_name: "Kiran".into(),
            seller_phone: String::new(),
            gold_type: "Coin".into(),
            purity: "24K".into(),
            weight: 10.0,
            reserve_price: 100_000,
            buy_now_price: Some(150_000),
            fulfillment_method: "pickup".into(),
            location: "Pune".into(),
            vendor_only: false,
            status: AuctionStatus::Live,
            created_at: t0() - Duration::hours(1),
            ends_at: t0() + ends_in,
            bids: Vec::new(),
            qna: Vec::new(),
            winner: None,
        }
    }

    fn bid(amount: i64) -> PlaceBidCommand {
        PlaceBidCommand {
            bidder_id: "u1".into(),
            bidder_name: "Anil".into(),
            amount,
            is_vendor: false,
        }
    }

    fn buyer() -> BuyNowCommand {
        BuyNowCommand {
            buyer_id: "u2".into(),
            buyer_name: "Bela".into(),
            is_vendor: false,
        }
    }

    #[test]
    fn first_bid_must_clear_one_increment() {
        let auctions = vec![auction(Duration::hours(1))];
        let err = place_bid(&auctions, "a1", &bid(MIN_INCREMENT - 1), t0()).unwrap_err();
        assert!(matches!(err, AuctionError::BidTooLow { minimum: 500, .. }));
        assert!(place_bid(&auctions, "a1", &bid(MIN_INCREMENT), t0()).is_ok());
    }

    #[test]
    fn low_bid_is_rejected_without_mutation() {
        let auctions = vec![auction(Duration::hours(1))];
        let (auctions, _) = place_bid(&auctions, "a1", &bid(90_000), t0()).unwrap();
        let before = auctions.clone();

        let err = place_bid(&auctions, "a1", &bid(90_499), t0()).unwrap_err();
        assert!(matches!(
            err,
            AuctionError::BidTooLow {
                amount: 90_499,
                minimum: 90_500
            }
        ));
        assert_eq!(auctions, before);

        let (auctions, _) = place_bid(&auctions, "a1", &bid(90_500), t0()).unwrap();
        assert_eq!(auctions[0].bids.len(), 2);
    }

    #[test]
    fn late_bid_extends_end_time() {
        let auctions = vec![auction(Duration::minutes(2))];
        let (next, event) = place_bid(&auctions, "a1", &bid(1_000), t0()).unwrap();
        let expected = t0() + Duration::minutes(ANTI_SNIPE_MINUTES);
        assert_eq!(next[0].ends_at, expected);
        match event {
            AuctionEvent::BidPlaced { extended_to, .. } => assert_eq!(extended_to, Some(expected)),
            other => panic!("unexpected event {other:?}"),
        }
    }

    #[test]
    fn early_bid_leaves_end_time() {
        let auctions = vec![auction(Duration::minutes(30))];
        let (next, _) = place_bid(&auctions, "a1", &bid(1_000), t0()).unwrap();
        assert_eq!(next[0].ends_at, auctions[0].ends_at);
    }

    #[test]
    fn extension_never_shortens() {
        let auctions = vec![auction(Duration::minutes(5))];
        let (next, event) = place_bid(&auctions, "a1", &bid(1_000), t0()).unwrap();
        assert_eq!(next[0].ends_at, auctions[0].ends_at);
        assert!(matches!(event, AuctionEvent::BidPlaced { extended_to: None, .. }));

        // a later bid inside the window moves the end forward from that bid
        let later = t0() + Duration::minutes(4);
        let (next, _) = place_bid(&next, "a1", &bid(2_000), later).unwrap();
        assert_eq!(next[0].ends_at, later + Duration::minutes(5));
        assert!(next[0].ends_at >= auctions[0].ends_at);
    }

    #[test]
    fn bids_refused_after_close_or_expiry() {
        let mut closed = auction(Duration::hours(1));
        closed.status = AuctionStatus::ReserveNotMet;
        assert!(matches!(
            place_bid(&[closed], "a1", &bid(1_000), t0()),
            Err(AuctionError::NotLive(AuctionStatus::ReserveNotMet))
        ));

        let expired = auction(Duration::seconds(-1));
        assert!(matches!(
            place_bid(&[expired], "a1", &bid(1_000), t0()),
            Err(AuctionError::Expired)
        ));

        assert!(matches!(
            place_bid(&[], "a1", &bid(1_000), t0()),
            Err(AuctionError::NotFound(_))
        ));
    }

    #[test]
    fn vendor_only_auction_refuses_customers() {
        let mut listing = auction(Duration::hours(1));
        listing.vendor_only = true;
        let auctions = vec![listing];
        assert!(matches!(
            place_bid(&auctions, "a1", &bid(1_000), t0()),
            Err(AuctionError::VendorOnly)
        ));
        let vendor = PlaceBidCommand {
            is_vendor: true,
            ..bid(1_000)
        };
        let (next, _) = place_bid(&auctions, "a1", &vendor, t0()).unwrap();
        assert!(next[0].bids[0].is_vendor);
    }

    #[test]
    fn bid_amount_is_capped_below_overflow() {
        let auctions = vec![auction(Duration::hours(1))];
        assert!(matches!(
            place_bid(&auctions, "a1", &bid(i64::MAX), t0()),
            Err(AuctionError::AmountOutOfRange { .. })
        ));

        let (next, _) = place_bid(&auctions, "a1", &bid(MAX_AMOUNT), t0()).unwrap();
        let public = PublicAuction::from(&next[0]);
        assert_eq!(public.highest_bid, Some(MAX_AMOUNT));
        assert_eq!(public.minimum_next_bid, i64::MAX);

        // nothing can follow a maximal bid, and bids never go back down
        assert!(matches!(
            place_bid(&next, "a1", &bid(MIN_INCREMENT), t0()),
            Err(AuctionError::BidTooLow { .. })
        ));
        assert!(matches!(
            place_bid(&next, "a1", &bid(i64::MAX), t0()),
            Err(AuctionError::AmountOutOfRange { .. })
        ));
    }

    #[test]
    fn vendor_only_buy_now_refuses_customers() {
        let mut listing = auction(Duration::hours(1));
        listing.vendor_only = true;
        let auctions = vec![listing];
        assert!(matches!(
            buy_now(&auctions, "a1", &buyer(), t0()),
            Err(AuctionError::VendorOnly)
        ));
        let vendor = BuyNowCommand {
            is_vendor: true,
            ..buyer()
        };
        let (next, event) = buy_now(&auctions, "a1", &vendor, t0()).unwrap();
        assert_eq!(next[0].status, AuctionStatus::Closed);
        assert!(event.is_some());
    }

    #[test]
    fn buy_now_closes_with_winner_and_terminal_bid() {
        let auctions = vec![auction(Duration::hours(1))];
        let (next, event) = buy_now(&auctions, "a1", &buyer(), t0()).unwrap();
        let closed = &next[0];
        assert_eq!(closed.status, AuctionStatus::Closed);
        assert_eq!(closed.bids.last().unwrap().amount, 150_000);
        let winner = closed.winner.as_ref().unwrap();
        assert_eq!(winner.bidder_id, "u2");
        assert!(winner.via_buy_now);
        assert!(matches!(event, Some(AuctionEvent::BuyNowExecuted { price: 150_000, .. })));
    }

    #[test]
    fn buy_now_is_noop_without_price_or_when_not_live() {
        let mut no_price = auction(Duration::hours(1));
        no_price.buy_now_price = None;
        let auctions = vec![no_price];
        let (next, event) = buy_now(&auctions, "a1", &buyer(), t0()).unwrap();
        assert_eq!(next, auctions);
        assert!(event.is_none());

        let mut closed = auction(Duration::hours(1));
        closed.status = AuctionStatus::Closed;
        let auctions = vec![closed];
        let (next, event) = buy_now(&auctions, "a1", &buyer(), t0()).unwrap();
        assert_eq!(next, auctions);
        assert!(event.is_none());
    }
}
