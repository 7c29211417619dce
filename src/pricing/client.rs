// region:    --- Imports
use super::MetalPrices;
use crate::config::Settings;
use chrono::{DateTime, Utc};
use thiserror::Error;
use tracing::{info, warn};

// endregion: --- Imports

#[derive(Debug, Error)]
pub enum PriceFeedError {
    #[error("no metals API key configured")]
    MissingApiKey,

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("upstream returned status {0}")]
    Status(u16),

    #[error("response body has no usable XAU/XAG rates")]
    MalformedBody,
}

// region:    --- Metals Price Client
pub struct MetalsPriceClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
    base_currency: String,
}

impl MetalsPriceClient {
    pub fn new(settings: &Settings) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: settings.metals.base_url.trim_end_matches('/').to_string(),
            api_key: settings.metals_api_key().map(str::to_string),
            base_currency: settings.metals.base_currency.clone(),
        }
    }

    pub fn currency(&self) -> &str {
        &self.base_currency
    }

    /// Live prices, or mock prices when anything goes wrong
    pub async fn fetch(&self, now: DateTime<Utc>) -> MetalPrices {
        match self.try_fetch(now).await {
            Ok(prices) => {
                info!(
                    "{:<12} --> gold {:.2}/g, silver {:.2}/g ({})",
                    "Pricing", prices.gold_per_gram, prices.silver_per_gram, prices.currency
                );
                prices
            }
            Err(e) => {
                warn!("{:<12} --> falling back to mock prices: {}", "Pricing", e);
                MetalPrices::mock(&self.base_currency, now)
            }
        }
    }

    pub async fn try_fetch(&self, now: DateTime<Utc>) -> Result<MetalPrices, PriceFeedError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(PriceFeedError::MissingApiKey)?;

        let response = self
            .http
            .get(format!("{}/latest", self.base_url))
            .query(&[
                ("api_key", api_key),
                ("base", self.base_currency.as_str()),
                ("currencies", "XAU,XAG"),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(PriceFeedError::Status(response.status().as_u16()));
        }

        let body: serde_json::Value = response
            .json()
            .await
            .map_err(|_| PriceFeedError::MalformedBody)?;
        MetalPrices::from_rates(&body, &self.base_currency, now).ok_or(PriceFeedError::MalformedBody)
    }
}
// endregion: --- Metals Price Client
