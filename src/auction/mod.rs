//! Gold auctions
//! 1. listing creation and expiry sweep (`lifecycle`)
//! 2. bids and buy-now live in `crate::bidding`
//! 3. public Q&A (`qna`)
//!
//! Every transition is a pure function over the whole collection; `service`
//! loads the collection from the store, applies one transition and writes it back.
use thiserror::Error;

pub mod events;
pub mod lifecycle;
pub mod model;
pub mod qna;
pub mod service;

pub use events::AuctionEvent;
pub use model::{Auction, AuctionStatus, Bid, NewAuction, PublicAuction, QnaEntry, Winner};
pub use service::AuctionService;

#[derive(Debug, Error)]
pub enum AuctionError {
    #[error("auction `{0}` not found")]
    NotFound(String),

    #[error("auction is not live (status: {})", .0.as_str())]
    NotLive(AuctionStatus),

    #[error("auction has already ended")]
    Expired,

    #[error("bid of {amount} is below the minimum of {minimum}")]
    BidTooLow { amount: i64, minimum: i64 },

    #[error("amount {amount} exceeds the maximum of {maximum}")]
    AmountOutOfRange { amount: i64, maximum: i64 },

    #[error("auction is open to vendors only")]
    VendorOnly,

    #[error("buy now is not available for this auction")]
    BuyNowUnavailable,

    #[error("question #{0} not found")]
    QuestionNotFound(usize),

    #[error("question #{0} is already answered")]
    AlreadyAnswered(usize),

    #[error("text must not be empty")]
    EmptyText,

    #[error("invalid auction: {0}")]
    InvalidAuction(String),
}
