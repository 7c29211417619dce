/// Auction lifecycle
/// 1. listing creation
/// 2. expiry sweep (live -> closed | reserve_not_met)
// region:    --- Imports
use super::events::AuctionEvent;
use super::model::{Auction, AuctionStatus, NewAuction, Winner, MAX_AMOUNT};
use super::AuctionError;
use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;
// endregion: --- Imports

pub const DEFAULT_DURATION_HOURS: i64 = 24;
pub const MAX_DURATION_HOURS: i64 = 168;

// region:    --- Create
fn validate(input: &NewAuction) -> Result<i64, AuctionError> {
    if input.seller_name.trim().is_empty() {
        return Err(AuctionError::InvalidAuction("seller name is required".into()));
    }
    if input.weight.is_nan() || input.weight <= 0.0 {
        return Err(AuctionError::InvalidAuction("weight must be positive".into()));
    }
    if input.reserve_price <= 0 {
        return Err(AuctionError::InvalidAuction(
            "reserve price must be positive".into(),
        ));
    }
    if input.reserve_price > MAX_AMOUNT || input.buy_now_price.is_some_and(|p| p > MAX_AMOUNT) {
        return Err(AuctionError::InvalidAuction(format!(
            "prices must not exceed {MAX_AMOUNT}"
        )));
    }
    if let Some(price) = input.buy_now_price {
        if price < input.reserve_price {
            return Err(AuctionError::InvalidAuction(
                "buy now price must not be below the reserve".into(),
            ));
        }
    }
    let hours = input.duration_hours.unwrap_or(DEFAULT_DURATION_HOURS);
    if !(1..=MAX_DURATION_HOURS).contains(&hours) {
        return Err(AuctionError::InvalidAuction(format!(
            "duration must be between 1 and {MAX_DURATION_HOURS} hours"
        )));
    }
    Ok(hours)
}

/// 1. Create a live listing ending `duration_hours` from now
pub fn create_auction(
    auctions: &[Auction],
    input: NewAuction,
    now: DateTime<Utc>,
) -> Result<(Vec<Auction>, AuctionEvent), AuctionError> {
    let hours = validate(&input)?;

    let auction = Auction {
        id: Uuid::new_v4().to_string(),
        seller_name: input.seller_name.trim().to_string(),
        seller_phone: input.seller_phone,
        gold_type: input.gold_type,
        purity: input.purity,
        weight: input.weight,
        reserve_price: input.reserve_price,
        buy_now_price: input.buy_now_price,
        fulfillment_method: input.fulfillment_method,
        location: input.location,
        vendor_only: input.vendor_only,
        status: AuctionStatus::Live,
        created_at: now,
        ends_at: now + Duration::hours(hours),
        bids: Vec::new(),
        qna: Vec::new(),
        winner: None,
    };
    let event = AuctionEvent::AuctionCreated {
        auction_id: auction.id.clone(),
        ends_at: auction.ends_at,
    };

    let mut next = auctions.to_vec();
    next.push(auction);
    Ok((next, event))
}
// endregion: --- Create

// region:    --- Sweep
/// 2. Resolve every live auction whose end time has passed
///
/// Auctions that are not live, or still running, come back untouched. An empty
/// event list means nothing changed.
pub fn sweep_expired(auctions: &[Auction], now: DateTime<Utc>) -> (Vec<Auction>, Vec<AuctionEvent>) {
    let mut events = Vec::new();
    let next = auctions
        .iter()
        .map(|auction| {
            if auction.status.is_terminal() || !auction.has_expired(now) {
                return auction.clone();
            }
            let mut resolved = auction.clone();
            match auction.highest_bid().filter(|_| auction.reserve_met()) {
                Some(bid) => {
                    resolved.status = AuctionStatus::Closed;
                    resolved.winner = Some(Winner {
                        bidder_id: bid.bidder_id.clone(),
                        bidder_name: bid.bidder_name.clone(),
                        amount: bid.amount,
                        via_buy_now: false,
                    });
                    events.push(AuctionEvent::AuctionClosed {
                        auction_id: auction.id.clone(),
                        winner_id: bid.bidder_id.clone(),
                        price: bid.amount,
                        timestamp: now,
                    });
                }
                None => {
                    resolved.status = AuctionStatus::ReserveNotMet;
                    resolved.winner = None;
                    events.push(AuctionEvent::ReserveNotMet {
                        auction_id: auction.id.clone(),
                        highest_bid: auction.highest_bid().map(|bid| bid.amount),
                        timestamp: now,
                    });
                }
            }
            resolved
        })
        .collect();
    (next, events)
}
// endregion: --- Sweep
