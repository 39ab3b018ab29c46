//! Application error types.
//!
//! All errors use `thiserror` for automatic Error trait derivation and provide
//! clear error messages with context. The executor facade folds every variant
//! into one of two result categories, see [`ErrorCategory`].

use thiserror::Error;

/// Application result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Main error enum for the tool dispatch layer.
#[derive(Error, Debug)]
pub enum Error {
    /// Descriptor or catalog problems detected before any I/O.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Referenced tool or file does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// Connection could not be established or the transfer broke off.
    #[error("network error: {0}")]
    Network(String),

    /// Upstream did not answer within the request timeout.
    #[error("timeout: {0}")]
    Timeout(String),

    /// Upstream answered with a non-success status.
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },

    /// Request could not be built: malformed URL, header name or header value.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Local rate limit rejected the call before dispatch.
    #[error("rate limit exceeded: {0}")]
    RateLimited(String),

    /// Internal errors.
    #[error("internal error: {0}")]
    Internal(String),

    /// Serialization/deserialization errors.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// I/O errors.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Coarse error classes surfaced through `ExecutionResult::error` prefixes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Request building, transport, timeout, HTTP status and rate-limit failures.
    Request,
    /// Everything else: configuration, malformed payloads, cache I/O.
    Unexpected,
}

impl ErrorCategory {
    /// Message prefix used when folding an error into a failed result.
    pub fn prefix(self) -> &'static str {
        match self {
            ErrorCategory::Request => "API request failed",
            ErrorCategory::Unexpected => "Unexpected error",
        }
    }
}

impl Error {
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::InvalidRequest(_)
            | Error::Network(_)
            | Error::Timeout(_)
            | Error::Http { .. }
            | Error::RateLimited(_) => ErrorCategory::Request,
            _ => ErrorCategory::Unexpected,
        }
    }

    /// Render as `"<category prefix>: <message>"`.
    pub fn to_result_message(&self) -> String {
        format!("{}: {}", self.category().prefix(), self)
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        let message = error_chain(&err);
        if let Some(status) = err.status() {
            Error::Http {
                status: status.as_u16(),
                message,
            }
        } else if err.is_timeout() {
            Error::Timeout(message)
        } else if err.is_builder() {
            Error::InvalidRequest(message)
        } else {
            Error::Network(message)
        }
    }
}

/// Display of `err` followed by every `source()` link, joined with `": "`.
///
/// Links whose text the previous message already contains are skipped.
pub fn error_chain(err: &dyn std::error::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !text.is_empty() && !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}

// Convenience constructors
impl Error {
    pub fn configuration(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    pub fn timeout(msg: impl Into<String>) -> Self {
        Self::Timeout(msg.into())
    }

    pub fn invalid_request(msg: impl Into<String>) -> Self {
        Self::InvalidRequest(msg.into())
    }

    pub fn rate_limited(msg: impl Into<String>) -> Self {
        Self::RateLimited(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}
