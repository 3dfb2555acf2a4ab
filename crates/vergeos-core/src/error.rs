//! Error types for VergeOS API operations.
//!
//! One error enum covers the whole SDK: transport failures, the HTTP status
//! classes the API uses, and local configuration/parsing problems.

use reqwest::StatusCode;
use thiserror::Error;

/// Main error type for VergeOS operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Could not reach the VergeOS system.
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Authentication rejected (401/403).
    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    /// Resource not found (404).
    #[error("Not found: {0}")]
    NotFound(String),

    /// Resource conflict (409).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Validation rejected by the API (422).
    #[error("Validation error: {0}")]
    Validation(String),

    /// Any other non-success API response.
    #[error("API error {status}: {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Message extracted from the response body.
        message: String,
    },

    /// Request timed out.
    #[error("Timeout: {0}")]
    Timeout(String),

    /// HTTP-level failure without a usable status code.
    #[error("HTTP request failed: {0}")]
    Http(String),

    /// Invalid client configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Failed to parse an API response.
    #[error("Failed to parse response: {0}")]
    Parse(String),

    /// Invalid endpoint URL.
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),
}

/// Specialized result type for VergeOS operations.
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Returns the error code for this error type.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::ConnectionFailed(_) => "CONNECTION_FAILED",
            Self::AuthenticationFailed(_) => "AUTHENTICATION_FAILED",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Conflict(_) => "CONFLICT",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Api { .. } => "API_ERROR",
            Self::Timeout(_) => "TIMEOUT",
            Self::Http(_) => "HTTP_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Parse(_) => "PARSE_ERROR",
            Self::InvalidEndpoint(_) => "INVALID_ENDPOINT",
        }
    }

    /// Map a non-success HTTP status and extracted message to an error.
    #[must_use]
    pub fn from_status(status: StatusCode, message: String) -> Self {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                Self::AuthenticationFailed(message)
            }
            StatusCode::NOT_FOUND => Self::NotFound(message),
            StatusCode::CONFLICT => Self::Conflict(message),
            StatusCode::UNPROCESSABLE_ENTITY => Self::Validation(message),
            _ => Self::Api {
                status: status.as_u16(),
                message,
            },
        }
    }

    /// Returns true when a request failing with this error may be retried.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::ConnectionFailed(_) | Self::Timeout(_) | Self::Api { status: 429, .. }
        ) || matches!(self, Self::Api { status, .. } if *status >= 500)
    }
}

// Conversions from external error types
impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(err.to_string())
        } else if err.is_connect() {
            Self::ConnectionFailed(err.to_string())
        } else {
            Self::Http(err.to_string())
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::InvalidEndpoint(err.to_string())
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Parse(err.to_string())
    }
}

impl From<validator::ValidationErrors> for Error {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::Config(err.to_string())
    }
}
