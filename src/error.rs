//! Unified SDK error types.

use thiserror::Error;

/// Top-level SDK error.
#[derive(Error, Debug)]
pub enum SdkError {
    #[error("HTTP error: {0}")]
    Http(#[from] HttpError),

    #[error("Stream error: {0}")]
    Stream(#[from] StreamError),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("{0}")]
    Other(String),
}

/// HTTP-layer errors raised while opening the stream.
#[derive(Error, Debug)]
pub enum HttpError {
    #[cfg(feature = "http")]
    #[error("Request failed: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Server error {status}: {body}")]
    ServerError { status: u16, body: String },

    #[error("Rate limited")]
    RateLimited,

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Connect timeout")]
    Timeout,
}

/// Errors that end a running stream in the `Failed` state.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StreamError {
    /// Connection refused, non-success status, or a read failure mid-body.
    #[error("Transport error: {0}")]
    Transport(String),

    /// No bytes arrived within the configured idle timeout.
    #[error("Stream idle for {idle_ms}ms")]
    Idle { idle_ms: u64 },

    #[error("No symbols to subscribe")]
    NoSymbols,
}

/// Reasons a single NDJSON line is rejected as a tick.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TickError {
    #[error("Missing result object")]
    MissingResult,

    #[error("Missing or invalid symbol: {0}")]
    InvalidSymbol(String),

    #[error("Symbol too short: {0}")]
    SymbolTooShort(String),

    #[error("Invalid price: {0}")]
    InvalidPrice(String),
}

impl From<HttpError> for StreamError {
    fn from(e: HttpError) -> Self {
        StreamError::Transport(e.to_string())
    }
}
