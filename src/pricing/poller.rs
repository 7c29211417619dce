// region:    --- Imports
use super::{MetalsPriceClient, PriceBoard};
use crate::clock::Clock;
use std::sync::Arc;
use tokio::time::{interval, Duration};
use tracing::debug;

// endregion: --- Imports

// region:    --- Price Poller
/// Refreshes the price board on a fixed period
pub struct PricePoller {
    client: Arc<MetalsPriceClient>,
    board: PriceBoard,
    clock: Arc<dyn Clock>,
    period: Duration,
}

impl PricePoller {
    pub fn new(
        client: Arc<MetalsPriceClient>,
        board: PriceBoard,
        clock: Arc<dyn Clock>,
        period: Duration,
    ) -> Self {
        Self {
            client,
            board,
            clock,
            period,
        }
    }

    /// One refresh; also used for the initial fetch at startup
    pub async fn refresh(&self) {
        let prices = self.client.fetch(self.clock.now()).await;
        self.board.publish(prices).await;
        debug!("{:<12} --> price board refreshed", "Pricing");
    }

    pub fn start(self) -> tokio::task::JoinHandle<()> {
        tokio::spawn(async move {
            let mut interval = interval(self.period);
            loop {
                interval.tick().await;
                self.refresh().await;
            }
        })
    }
}
// endregion: --- Price Poller
