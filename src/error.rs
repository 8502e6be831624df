use reqwest::StatusCode;
use thiserror::Error;

use crate::models::location::LocationCode;

/// Problems found while building `AppConfig` at startup
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set in environment")]
    Missing(&'static str),

    #[error("{0} is set but holds no usable value")]
    Empty(&'static str),

    #[error("{key} is not a valid hour: {value}")]
    InvalidHour { key: &'static str, value: String },

    #[error("time window start {start} is after end {end}")]
    InvalidWindow { start: String, end: String },

    #[error("duplicate location code {0} in location table")]
    DuplicateLocation(LocationCode),

    #[error("failed to read config file: {0}")]
    File(#[from] dotenv::Error),
}

/// Transport-level failure talking to the booking API
#[derive(Debug, Error)]
pub enum UpstreamError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("upstream answered with status {0}")]
    Status(StatusCode),
}

/// A slot record whose date or time does not match the upstream format
#[derive(Debug, Error)]
#[error("malformed {field} '{value}' in slot record: {source}")]
pub struct SlotParseError {
    pub field: &'static str,
    pub value: String,
    #[source]
    pub source: chrono::ParseError,
}

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("endpoint answered with status {0}")]
    Status(StatusCode),

    #[error("no pushdeer tokens configured")]
    NoTokens,

    #[error("{failed} of {total} pushdeer tokens failed")]
    PartialBroadcast { failed: usize, total: usize },
}

/// Errors that end a run
#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Parse(#[from] SlotParseError),
}
