//! Monitor client error types

use reqwest::StatusCode;

/// Error type for monitoring API requests
#[derive(Debug, thiserror::Error)]
pub enum MonitorError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("request failed with status {status}: {body}")]
    Status { status: StatusCode, body: String },

    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("api returned no results")]
    EmptyResults,

    #[error("api reported failed results: {}", .0.join("; "))]
    PartialFailure(Vec<String>),

    #[error("invalid base url: {0}")]
    InvalidBaseUrl(String),
}

pub type Result<T> = std::result::Result<T, MonitorError>;
