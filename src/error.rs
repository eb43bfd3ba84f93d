//! Error types for calls against the job-board API.
use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("API returned {status}: {body}")]
    Status { status: StatusCode, body: String },

    /// 2xx response whose body carries an `"error"` field.
    #[error("API rejected request: {0}")]
    Rejected(String),

    #[error("Unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}
