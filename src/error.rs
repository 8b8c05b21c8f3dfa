//! Error types

use thiserror::Error;

/// Errors raised by the pick-building core and its backend client.
///
/// Rule violations a user can fix (locked game, pick limit, contradictory
/// legs) are not errors; see [`crate::combo::LegRejection`] and
/// [`crate::slip::SlipRejection`].
#[derive(Error, Debug)]
pub enum PickError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Backend returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Invalid American odds: {0} (must be <= -100 or >= +100)")]
    InvalidOdds(i64),

    #[error("Odds unavailable: {0}")]
    OddsUnavailable(String),

    #[error("Combined odds out of range")]
    OddsOverflow,

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, PickError>;
