//! Error types for ClearAir

use thiserror::Error;

/// Errors that can occur while parsing, validating or persisting data.
///
/// Classification, advice lookup, forecast synthesis and personalization are
/// total and never produce one of these.
#[derive(Debug, Error)]
pub enum ClearAirError {
    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid outdoor hour {0}: must be between 0 and 23")]
    InvalidHour(u8),

    #[error("Invalid reading: {0}")]
    InvalidReading(String),

    #[error("Invalid forecast: {0}")]
    InvalidForecast(String),

    #[error("Unknown value for {field}: {value}")]
    UnknownVariant { field: &'static str, value: String },

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Profile store error: {0}")]
    ProfileStore(String),
}
