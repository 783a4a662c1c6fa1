//! Typed errors for the ad-funnel library.
//!
//! Uses `thiserror` for library errors (not `anyhow`). Only configuration and
//! input validation can stop a run; every failure after that point is turned
//! into a [`FailureKind`] placeholder or an in-band value.

use openai_client::OpenAIError;
use thiserror::Error;

/// Errors that stop a run before any network activity.
#[derive(Debug, Error)]
pub enum FunnelError {
    /// Deployment configuration is missing or unusable
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    /// Campaign inputs failed validation
    #[error("invalid input: {0}")]
    Input(#[from] InputError),
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Required environment variable is not set
    #[error("{0} must be set")]
    Missing(&'static str),

    /// API key is still the template placeholder
    #[error("{0} is still set to the placeholder value")]
    Placeholder(&'static str),

    /// Variable is set but cannot be parsed
    #[error("{name} is invalid: {reason}")]
    Invalid { name: &'static str, reason: String },
}

/// Campaign input validation errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    /// Company name is blank
    #[error("company name is required")]
    MissingCompanyName,

    /// Booking link is blank
    #[error("link to demo booking or sales meeting page is required")]
    MissingBookingLink,

    /// Content count outside [1, 20]
    #[error("content count must be between {min} and {max}, got {got}")]
    ContentCountOutOfRange { got: u32, min: u32, max: u32 },

    /// Funnel objective label not recognised
    #[error("unknown funnel objective: {0}")]
    UnknownObjective(String),
}

/// Errors raised while pulling raw text from a source.
///
/// These never leave the acquisition step; they degrade to empty text.
#[derive(Debug, Error)]
pub enum ExtractionError {
    /// HTTP request failed or returned a non-success status
    #[error("HTTP error fetching {url}: {reason}")]
    Http { url: String, reason: String },

    /// URL could not be parsed
    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Document extension is not PDF or PPTX
    #[error("unsupported file type: {0}")]
    UnsupportedFormat(String),

    /// Document bytes could not be decoded
    #[error("could not read {name}: {reason}")]
    Document { name: String, reason: String },

    /// HTTP client could not be built
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

/// Errors raised while serializing the export artifacts.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Writing the zip container failed
    #[error("zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// Writing a part into the container failed
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Why a placeholder record stands in for generated content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FailureKind {
    /// Credential rejected; the channel stops here
    Auth,
    /// Request throttled
    RateLimit,
    /// Could not reach the API
    Connection,
    /// Request rejected as malformed
    MalformedRequest,
    /// Any other API failure, with the HTTP status when known
    Api(Option<u16>),
    /// Response content was not JSON
    JsonParse,
    /// JSON lacked the root key or the root was not a list
    Structure,
    /// A list item was not a JSON object
    MalformedItem,
    /// Response listed fewer items than requested
    MissingItem,
}

impl FailureKind {
    /// Short machine-ish tag used in ad names and Google headlines.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Auth => "AuthError",
            Self::RateLimit => "RateLimitError",
            Self::Connection => "ConnectionError",
            Self::MalformedRequest => "InvalidRequest",
            Self::Api(_) => "APIError",
            Self::JsonParse => "JSONError",
            Self::Structure => "StructError",
            Self::MalformedItem => "ItemError",
            Self::MissingItem => "MissingItem",
        }
    }

    /// Human-readable marker placed where generated copy would be.
    pub fn message(&self) -> String {
        match self {
            Self::Auth => "OpenAI Auth Failed".to_string(),
            Self::RateLimit => "Rate Limit Exceeded".to_string(),
            Self::Connection => "API Connection Error".to_string(),
            Self::MalformedRequest => "Invalid Request to OpenAI".to_string(),
            Self::Api(Some(status)) => format!("API Error {}", status),
            Self::Api(None) => "Unexpected OpenAI Error".to_string(),
            Self::JsonParse => "JSON Parse Error".to_string(),
            Self::Structure => "JSON Structure Error".to_string(),
            Self::MalformedItem => "Malformed Ad Item".to_string(),
            Self::MissingItem => "Missing From Response".to_string(),
        }
    }

    /// Whether this failure ends the current channel.
    pub fn halts_channel(&self) -> bool {
        matches!(self, Self::Auth)
    }
}

impl From<&OpenAIError> for FailureKind {
    fn from(err: &OpenAIError) -> Self {
        match err {
            OpenAIError::Auth(_) => Self::Auth,
            OpenAIError::RateLimit(_) => Self::RateLimit,
            OpenAIError::Network(_) => Self::Connection,
            OpenAIError::BadRequest(_) => Self::MalformedRequest,
            OpenAIError::Api { status, .. } => Self::Api(Some(*status)),
            OpenAIError::Config(_) | OpenAIError::Parse(_) => Self::Api(None),
        }
    }
}

/// Result type alias for extraction operations.
pub type ExtractionResult<T> = std::result::Result<T, ExtractionError>;

/// Result type alias for report assembly.
pub type ReportResult<T> = std::result::Result<T, ReportError>;
