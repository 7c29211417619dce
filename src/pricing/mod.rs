//! Live metal prices.
//!
//! The feed never fails outward: any problem with the upstream API yields
//! fixed mock prices flagged with `is_mock`.
// region:    --- Imports
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::RwLock;

mod client;
mod poller;

pub use client::{MetalsPriceClient, PriceFeedError};
pub use poller::PricePoller;

// endregion: --- Imports

// region:    --- Metal Prices
pub const TROY_OUNCE_GRAMS: f64 = 31.1034768;
pub const MOCK_GOLD_PER_GRAM: f64 = 7450.0;
pub const MOCK_SILVER_PER_GRAM: f64 = 92.0;

#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct MetalPrices {
    pub gold_per_gram: f64,
    pub silver_per_gram: f64,
    pub currency: String,
    pub is_mock: bool,
    pub fetched_at: DateTime<Utc>,
}

impl MetalPrices {
    pub fn mock(currency: &str, at: DateTime<Utc>) -> Self {
        Self {
            gold_per_gram: MOCK_GOLD_PER_GRAM,
            silver_per_gram: MOCK_SILVER_PER_GRAM,
            currency: currency.to_string(),
            is_mock: true,
            fetched_at: at,
        }
    }

    /// Reads `rates.XAU` / `rates.XAG` (metal units per one currency unit)
    /// and converts them to a price per gram.
    pub fn from_rates(body: &serde_json::Value, currency: &str, at: DateTime<Utc>) -> Option<Self> {
        let rates = body.get("rates")?;
        let per_gram = |symbol: &str| -> Option<f64> {
            let rate = rates.get(symbol)?.as_f64()?;
            if !rate.is_finite() || rate <= 0.0 {
                return None;
            }
            let per_ounce = 1.0 / rate;
            Some((per_ounce / TROY_OUNCE_GRAMS * 100.0).round() / 100.0)
        };
        Some(Self {
            gold_per_gram: per_gram("XAU")?,
            silver_per_gram: per_gram("XAG")?,
            currency: currency.to_string(),
            is_mock: false,
            fetched_at: at,
        })
    }
}
// endregion: --- Metal Prices

// region:    --- Price Board
/// Latest known prices, shared between the poller and readers
#[derive(Clone)]
pub struct PriceBoard {
    latest: Arc<RwLock<MetalPrices>>,
}

impl PriceBoard {
    pub fn new(initial: MetalPrices) -> Self {
        Self {
            latest: Arc::new(RwLock::new(initial)),
        }
    }

    pub async fn latest(&self) -> MetalPrices {
        self.latest.read().await.clone()
    }

    pub async fn publish(&self, prices: MetalPrices) {
        *self.latest.write().await = prices;
    }
}
// endregion: --- Price Board
