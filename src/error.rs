//! Bakelens error types

use std::time::Duration;

/// Bakelens error types
#[derive(Debug, thiserror::Error)]
pub enum BakelensError {
    // Model/network errors
    #[error("HTTP error: {0}")]
    Http(String),

    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("rate limited, retry after {retry_after:?}")]
    RateLimited { retry_after: Option<Duration> },

    // Data errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("content filtered: {reason}")]
    ContentFiltered { reason: String },

    #[error("empty response from model")]
    EmptyResponse,

    // Persistence errors — the core logs and swallows these internally;
    // they only cross the public boundary from the Storage trait itself.
    #[error("storage error: {0}")]
    Storage(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // Configuration errors
    #[error("no vision model configured")]
    NoModel,

    #[error("configuration error: {0}")]
    Configuration(String),
}

impl BakelensError {
    /// Whether retrying the same request may succeed.
    ///
    /// Drives the `retryable` flag on [`AnalysisResult`](crate::AnalysisResult):
    /// transport and rate-limit failures are worth retrying, content and
    /// configuration failures are not.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            BakelensError::Http(_)
                | BakelensError::Api { .. }
                | BakelensError::RateLimited { .. }
                | BakelensError::EmptyResponse
                | BakelensError::Storage(_)
                | BakelensError::Io(_)
        )
    }
}

impl From<reqwest::Error> for BakelensError {
    fn from(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            BakelensError::Api {
                status: status.as_u16(),
                message: err.to_string(),
            }
        } else {
            BakelensError::Http(err.to_string())
        }
    }
}

/// Result type alias for Bakelens operations
pub type Result<T> = std::result::Result<T, BakelensError>;
