/// Auction expiry scheduler
/// Polls the auction service on a fixed period and resolves every live auction
/// whose end time has passed. Buy-now closes auctions directly and does not
/// wait for this loop.
// region:    --- Imports
use crate::auction::AuctionService;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio::time::{interval, Duration, MissedTickBehavior};
use tracing::{debug, error};

// endregion: --- Imports

// region:    --- Auction Scheduler
pub struct AuctionScheduler {
    service: Arc<AuctionService>,
    period: Duration,
}

impl AuctionScheduler {
    pub fn new(service: Arc<AuctionService>, period: Duration) -> Self {
        Self { service, period }
    }

    /// Runs one sweep; returns how many auctions were resolved
    pub async fn tick(&self) -> usize {
        match self.service.sweep_expired().await {
            Ok(events) => {
                debug!("{:<12} --> sweep done, resolved: {}", "Scheduler", events.len());
                events.len()
            }
            Err(e) => {
                error!("{:<12} --> sweep failed: {}", "Scheduler", e);
                0
            }
        }
    }

    /// Spawns the sweep loop
    pub fn start(self) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = interval(self.period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                self.tick().await;
            }
        })
    }
}
// endregion: --- Auction Scheduler
