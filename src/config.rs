//! Configuration management

use crate::error::Result;
use crate::types::AmericanOdds;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Environment variable prefix for overrides, e.g. `GOTLOCKS__API__BASE_URL`.
const ENV_PREFIX: &str = "GOTLOCKS";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub combo: ComboConfig,
    #[serde(default)]
    pub slips: SlipConfig,
    #[serde(default)]
    pub odds: OddsConfig,
}

impl Config {
    /// Load configuration from an optional TOML file plus environment overrides.
    ///
    /// A missing file is not an error; defaults and the environment still apply.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        dotenvy::dotenv().ok();

        let path = path.as_ref();
        let settings = config::Config::builder()
            .add_source(config::File::from(path).required(false))
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?;

        let config: Config = settings.try_deserialize()?;
        tracing::debug!(path = %path.display(), "configuration loaded");
        Ok(config)
    }
}

/// Backend endpoints used for odds validation and pick submission
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Bearer token sent with every request
    #[serde(default)]
    pub api_token: Option<String>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            api_token: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8000/api".to_string()
}

fn default_timeout_secs() -> u64 {
    10
}

/// Combo (parlay) construction limits
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComboConfig {
    #[serde(default = "default_min_legs")]
    pub min_legs: usize,
    #[serde(default = "default_max_legs")]
    pub max_legs: usize,
}

impl Default for ComboConfig {
    fn default() -> Self {
        Self {
            min_legs: default_min_legs(),
            max_legs: default_max_legs(),
        }
    }
}

fn default_min_legs() -> usize {
    2
}

fn default_max_legs() -> usize {
    8
}

/// Pick limit and eligible-date window for slips that leave them unset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlipConfig {
    #[serde(default = "default_window_days")]
    pub window_days: u32,
    #[serde(default = "default_pick_limit")]
    pub pick_limit: u32,
}

impl Default for SlipConfig {
    fn default() -> Self {
        Self {
            window_days: default_window_days(),
            pick_limit: default_pick_limit(),
        }
    }
}

fn default_window_days() -> u32 {
    6
}

fn default_pick_limit() -> u32 {
    5
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OddsConfig {
    /// Price used when the odds backend can't be reached
    #[serde(default = "default_fallback_odds")]
    pub fallback_odds: AmericanOdds,
}

impl Default for OddsConfig {
    fn default() -> Self {
        Self {
            fallback_odds: default_fallback_odds(),
        }
    }
}

fn default_fallback_odds() -> AmericanOdds {
    AmericanOdds::STANDARD
}
