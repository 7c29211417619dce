//! Bidder-facing commands against the auction collection.
pub mod commands;

pub use commands::{buy_now, place_bid, BuyNowCommand, PlaceBidCommand, ANTI_SNIPE_MINUTES};
