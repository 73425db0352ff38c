//! JSON Ledger API related error types.
use serde::{Deserialize, Serialize};

/// Ledger API errors.
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    /// Errors reported by the ledger as a JSON error object.
    #[error(transparent)]
    ApiError(#[from] ApiError),
    /// Non-success status whose body is not a ledger error object.
    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },
    /// Errors directly coming from reqwest
    #[error(transparent)]
    ReqwestError(#[from] reqwest::Error),
    /// The body was not the JSON document we expected.
    #[error("error decoding response body: {0}")]
    Decode(#[from] serde_json::Error),
    /// The top-level document has none of the known shapes.
    #[error("unexpected response shape: {0}")]
    UnexpectedShape(String),
}

impl LedgerError {
    /// The error rendered as text and cut to at most `max` characters.
    ///
    /// Used when a failed step is reported and the run continues.
    pub fn truncated(&self, max: usize) -> String {
        self.to_string().chars().take(max).collect()
    }
}

/// Error object returned by the ledger, e.g.
/// `{"code": "NOT_FOUND", "cause": "..."}`.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct ApiError {
    pub code: String,
    #[serde(default)]
    pub cause: String,
}

impl std::error::Error for ApiError {}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} - {}", self.code, self.cause)
    }
}
