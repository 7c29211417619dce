pub mod auction;
pub mod bidding;
pub mod billing;
pub mod clock;
pub mod config;
pub mod error;
pub mod handlers;
pub mod pricing;
pub mod scheduler;
pub mod store;
