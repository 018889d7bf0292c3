//! Centralized error types for the weatherlog tools.
//!
//! Each failure domain gets its own enum so callers can branch on the
//! cases that matter to them:
//! - `ConfigError` aborts a run before any collection starts
//! - `FetchError` is isolated to a single city within a batch
//! - `StoreError` is fatal for the current operation

use thiserror::Error;

/// Configuration errors. All of these are fatal at startup.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("no OpenWeatherMap API key configured; set OPENWEATHER_API_KEY or add api_key to config.toml")]
    MissingApiKey,

    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error("configuration parse error: {0}")]
    Parse(String),
}

/// Weather fetch errors. One of these only ever affects the city
/// being fetched; the batch continues.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request timed out")]
    Timeout,

    #[error("connection failed: {0}")]
    Connection(String),

    #[error("weather API returned status {status}")]
    Api { status: u16 },

    #[error("malformed weather response: {0}")]
    Decode(String),

    #[error("weather response missing required field: {0}")]
    MissingField(&'static str),

    #[error("failed to build HTTP client: {0}")]
    Client(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else if err.is_decode() {
            FetchError::Decode(err.to_string())
        } else if err.is_connect() {
            FetchError::Connection(err.to_string())
        } else if let Some(status) = err.status() {
            FetchError::Api {
                status: status.as_u16(),
            }
        } else {
            FetchError::Connection(err.to_string())
        }
    }
}

/// Storage errors. Not swallowed anywhere: a non-functioning store
/// makes continued collection pointless.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("weather database unavailable: {0}")]
    Unavailable(String),

    #[error("weather database query failed: {0}")]
    Query(String),

    #[error("record rejected before insert: missing or invalid {field}")]
    InvalidRecord { field: &'static str },

    #[error("invalid persisted record data: {0}")]
    InvalidData(String),
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(_, Some(msg)) if msg.contains("unable to open") => {
                StoreError::Unavailable(err.to_string())
            }
            _ => StoreError::Query(err.to_string()),
        }
    }
}
