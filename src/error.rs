//! Error types for Zaptec API operations.

use thiserror::Error;

/// Errors that can occur during Zaptec API operations.
#[derive(Debug, Error)]
pub enum ZaptecError {
    /// Configuration is missing or incomplete.
    #[error("Zaptec configuration required: {0}")]
    ConfigMissing(String),

    /// The caller broke an operation's contract (e.g. `from` after `to`).
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Credential exchange failed, or a request was still unauthorized
    /// after one token refresh.
    #[error("Authentication failed (HTTP {status}): {message}")]
    Authentication { status: u16, message: String },

    /// Non-success response other than an authorization failure.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The request did not complete within the configured timeout.
    #[error("Request timed out")]
    Timeout,

    /// Page-count safety bound exceeded or inconsistent page total.
    #[error("Pagination error: {0}")]
    Pagination(String),

    /// A successful response whose shape no longer matches the record type.
    #[error(
        "Response for '{schema}' does not match the expected schema \
         (missing: {missing_fields:?}, unexpected types: {unexpected_types:?})"
    )]
    SchemaValidation {
        schema: &'static str,
        missing_fields: Vec<String>,
        unexpected_types: Vec<String>,
    },

    /// A multi-page fetch was cancelled between pages.
    #[error("Operation cancelled")]
    Cancelled,

    /// HTTP transport error.
    #[error("HTTP transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

impl ZaptecError {
    /// True when the upstream API answered successfully but broke its
    /// response contract.
    #[must_use]
    pub fn is_contract_change(&self) -> bool {
        matches!(self, Self::SchemaValidation { .. })
    }

    /// Map a `reqwest` failure, keeping timeouts distinct from other
    /// transport errors.
    pub(crate) fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Transport(err)
        }
    }
}

/// Result type alias for Zaptec operations.
pub type Result<T> = core::result::Result<T, ZaptecError>;
