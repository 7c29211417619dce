use super::AuctionError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Minimum step between consecutive bids
pub const MIN_INCREMENT: i64 = 500;

/// Largest amount a bid, reserve or buy-now price may carry; one more
/// increment on top still fits in an `i64`
pub const MAX_AMOUNT: i64 = i64::MAX - MIN_INCREMENT;

// Auction lifecycle state
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AuctionStatus {
    Live,
    Closed,
    ReserveNotMet,
    // declared for a payout verification step; nothing transitions here yet
    PendingVerification,
    Completed,
}

impl AuctionStatus {
    pub fn is_terminal(self) -> bool {
        !matches!(self, AuctionStatus::Live)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            AuctionStatus::Live => "live",
            AuctionStatus::Closed => "closed",
            AuctionStatus::ReserveNotMet => "reserve_not_met",
            AuctionStatus::PendingVerification => "pending_verification",
            AuctionStatus::Completed => "completed",
        }
    }
}

// Bid model
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Bid {
    pub id: String,
    pub bidder_id: String,
    pub bidder_name: String,
    pub amount: i64,
    pub time: DateTime<Utc>,
    pub is_vendor: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Winner {
    pub bidder_id: String,
    pub bidder_name: String,
    pub amount: i64,
    pub via_buy_now: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QnaEntry {
    pub q: String,
    pub a: Option<String>,
    pub asked_by: String,
    pub asked_at: DateTime<Utc>,
    pub answered_at: Option<DateTime<Utc>>,
}

// Auction model
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Auction {
    pub id: String,
    pub seller_name: String,
    pub seller_phone: String,
    pub gold_type: String,
    pub purity: String,
    /// grams
    pub weight: f64,
    pub reserve_price: i64,
    pub buy_now_price: Option<i64>,
    pub fulfillment_method: String,
    pub location: String,
    pub vendor_only: bool,
    pub status: AuctionStatus,
    pub created_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    #[serde(default)]
    pub bids: Vec<Bid>,
    #[serde(default)]
    pub qna: Vec<QnaEntry>,
    #[serde(default)]
    pub winner: Option<Winner>,
}

impl Auction {
    pub fn highest_bid(&self) -> Option<&Bid> {
        self.bids.iter().max_by_key(|bid| bid.amount)
    }

    /// 0 with no bids
    pub fn highest_amount(&self) -> i64 {
        self.highest_bid().map_or(0, |bid| bid.amount)
    }

    pub fn minimum_next_bid(&self) -> i64 {
        self.highest_amount().saturating_add(MIN_INCREMENT)
    }

    pub fn has_expired(&self, now: DateTime<Utc>) -> bool {
        self.ends_at <= now
    }

    pub fn reserve_met(&self) -> bool {
        self.highest_bid()
            .is_some_and(|bid| bid.amount >= self.reserve_price)
    }
}

/// Index of `auction_id` in the collection
pub(crate) fn position(auctions: &[Auction], auction_id: &str) -> Result<usize, AuctionError> {
    auctions
        .iter()
        .position(|auction| auction.id == auction_id)
        .ok_or_else(|| AuctionError::NotFound(auction_id.to_string()))
}

/// Auction listing request
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewAuction {
    pub seller_name: String,
    #[serde(default)]
    pub seller_phone: String,
    pub gold_type: String,
    pub purity: String,
    pub weight: f64,
    pub reserve_price: i64,
    #[serde(default)]
    pub buy_now_price: Option<i64>,
    #[serde(default)]
    pub fulfillment_method: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub vendor_only: bool,
    #[serde(default)]
    pub duration_hours: Option<i64>,
}

/// Auction as shown to bidders: the reserve amount is withheld
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct PublicAuction {
    pub id: String,
    pub seller_name: String,
    pub seller_phone: String,
    pub gold_type: String,
    pub purity: String,
    pub weight: f64,
    pub buy_now_price: Option<i64>,
    pub fulfillment_method: String,
    pub location: String,
    pub vendor_only: bool,
    pub status: AuctionStatus,
    pub created_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    pub bids: Vec<Bid>,
    pub qna: Vec<QnaEntry>,
    pub winner: Option<Winner>,
    pub highest_bid: Option<i64>,
    pub minimum_next_bid: i64,
    pub reserve_met: bool,
}

impl From<&Auction> for PublicAuction {
    fn from(auction: &Auction) -> Self {
        Self {
            id: auction.id.clone(),
            seller_name: auction.seller_name.clone(),
            seller_phone: auction.seller_phone.clone(),
            gold_type: auction.gold_type.clone(),
            purity: auction.purity.clone(),
            weight: auction.weight,
            buy_now_price: auction.buy_now_price,
            fulfillment_method: auction.fulfillment_method.clone(),
            location: auction.location.clone(),
            vendor_only: auction.vendor_only,
            status: auction.status,
            created_at: auction.created_at,
            ends_at: auction.ends_at,
            bids: auction.bids.clone(),
            qna: auction.qna.clone(),
            winner: auction.winner.clone(),
            highest_bid: auction.highest_bid().map(|bid| bid.amount),
            minimum_next_bid: auction.minimum_next_bid(),
            reserve_met: auction.reserve_met(),
        }
    }
}
