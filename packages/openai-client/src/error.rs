//! Error types for OpenAI client.

use reqwest::StatusCode;
use thiserror::Error;

/// Result type for OpenAI client operations.
pub type Result<T> = std::result::Result<T, OpenAIError>;

/// OpenAI client errors.
///
/// Non-2xx responses are classified by status code so callers can react to
/// credential problems, throttling and malformed requests separately.
#[derive(Debug, Error)]
pub enum OpenAIError {
    /// Configuration error (missing API key, invalid settings)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Credential rejected (401, 403)
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Too many requests or quota exhausted (429)
    #[error("Rate limit exceeded: {0}")]
    RateLimit(String),

    /// Request rejected as malformed (400, 404, 422)
    #[error("Invalid request: {0}")]
    BadRequest(String),

    /// Network error (connection failed, timeout)
    #[error("Network error: {0}")]
    Network(String),

    /// Any other non-2xx response
    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    /// Parse error (invalid JSON envelope, missing choices)
    #[error("Parse error: {0}")]
    Parse(String),
}

impl OpenAIError {
    /// Classify a non-success HTTP response.
    pub fn from_status(status: StatusCode, body: impl Into<String>) -> Self {
        let message = body.into();
        match status.as_u16() {
            401 | 403 => Self::Auth(message),
            429 => Self::RateLimit(message),
            400 | 404 | 422 => Self::BadRequest(message),
            code => Self::Api {
                status: code,
                message,
            },
        }
    }

    /// Whether the credential itself was rejected.
    pub fn is_auth(&self) -> bool {
        matches!(self, Self::Auth(_))
    }
}
