//! Runtime settings.
//! Defaults, then an optional JSON settings file, then `JM__*` environment
//! variables. A missing settings file is not an error.
// region:    --- Imports
use config::{Config, Environment, File, FileFormat};
use serde::Deserialize;

// endregion: --- Imports

// region:    --- Settings
pub const SETTINGS_FILE_ENV: &str = "JM_SETTINGS_FILE";
const DEFAULT_SETTINGS_FILE: &str = "settings.json";

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    #[serde(default)]
    pub server: ServerSettings,
    #[serde(default)]
    pub database_url: Option<String>,
    #[serde(default)]
    pub metals: MetalsSettings,
    #[serde(default)]
    pub auction: AuctionSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerSettings {
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,
}

#[derive(Debug, Deserialize, Clone)]
pub struct MetalsSettings {
    #[serde(default = "default_metals_base_url")]
    pub base_url: String,
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default = "default_base_currency")]
    pub base_currency: String,
    #[serde(default = "default_poll_interval_secs")]
    pub poll_interval_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
pub struct AuctionSettings {
    #[serde(default = "default_sweep_interval_secs")]
    pub sweep_interval_secs: u64,
}

fn default_bind_addr() -> String {
    "0.0.0.0:3000".to_string()
}

fn default_metals_base_url() -> String {
    "https://api.metalpriceapi.com/v1".to_string()
}

fn default_base_currency() -> String {
    "INR".to_string()
}

fn default_poll_interval_secs() -> u64 {
    60
}

fn default_sweep_interval_secs() -> u64 {
    2
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
        }
    }
}

impl Default for MetalsSettings {
    fn default() -> Self {
        Self {
            base_url: default_metals_base_url(),
            api_key: None,
            base_currency: default_base_currency(),
            poll_interval_secs: default_poll_interval_secs(),
        }
    }
}

impl Default for AuctionSettings {
    fn default() -> Self {
        Self {
            sweep_interval_secs: default_sweep_interval_secs(),
        }
    }
}

impl Settings {
    /// Loads settings from `.env`, the settings file and the environment.
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        let path =
            std::env::var(SETTINGS_FILE_ENV).unwrap_or_else(|_| DEFAULT_SETTINGS_FILE.to_string());

        Config::builder()
            .add_source(File::new(&path, FileFormat::Json).required(false))
            .add_source(Environment::with_prefix("JM").separator("__"))
            .build()?
            .try_deserialize()
    }

    /// Parses settings from a JSON document, applying defaults for absent keys.
    pub fn from_json(json: &str) -> Result<Self, config::ConfigError> {
        Config::builder()
            .add_source(File::from_str(json, FileFormat::Json))
            .build()?
            .try_deserialize()
    }

    /// Empty API keys are treated as absent.
    pub fn metals_api_key(&self) -> Option<&str> {
        self.metals
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}
// endregion: --- Settings
