use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// What a state transition did; returned by every auction transform
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub enum AuctionEvent {
    AuctionCreated {
        auction_id: String,
        ends_at: DateTime<Utc>,
    },
    // accepted bid
    BidPlaced {
        auction_id: String,
        bidder_id: String,
        bid_amount: i64,
        timestamp: DateTime<Utc>,
        /// New end time when the bid triggered anti-sniping
        extended_to: Option<DateTime<Utc>>,
    },
    // closes the auction immediately
    BuyNowExecuted {
        auction_id: String,
        buyer_id: String,
        price: i64,
        timestamp: DateTime<Utc>,
    },
    AuctionClosed {
        auction_id: String,
        winner_id: String,
        price: i64,
        timestamp: DateTime<Utc>,
    },
    ReserveNotMet {
        auction_id: String,
        highest_bid: Option<i64>,
        timestamp: DateTime<Utc>,
    },
    QuestionAsked {
        auction_id: String,
        index: usize,
        timestamp: DateTime<Utc>,
    },
    QuestionAnswered {
        auction_id: String,
        index: usize,
        timestamp: DateTime<Utc>,
    },
}

impl AuctionEvent {
    pub fn auction_id(&self) -> &str {
        match self {
            AuctionEvent::AuctionCreated { auction_id, .. }
            | AuctionEvent::BidPlaced { auction_id, .. }
            | AuctionEvent::BuyNowExecuted { auction_id, .. }
            | AuctionEvent::AuctionClosed { auction_id, .. }
            | AuctionEvent::ReserveNotMet { auction_id, .. }
            | AuctionEvent::QuestionAsked { auction_id, .. }
            | AuctionEvent::QuestionAnswered { auction_id, .. } => auction_id,
        }
    }
}
