//! Pure OpenAI REST API client
//!
//! Covers the one endpoint the ad generator needs, chat completions, with no
//! domain-specific logic. Non-2xx responses come back as a typed
//! [`OpenAIError`] classified from the HTTP status, so callers can tell a
//! revoked key from a throttled request without string matching.
//!
//! # Example
//!
//! ```rust,ignore
//! use openai_client::{OpenAIClient, ChatRequest, Message};
//!
//! let client = OpenAIClient::from_env()?;
//!
//! let response = client
//!     .chat_completion(
//!         ChatRequest::new("gpt-4.1-mini")
//!             .message(Message::system("Reply in JSON."))
//!             .message(Message::user("Three colors, root key \"colors\"."))
//!             .json_object(),
//!     )
//!     .await?;
//! ```

pub mod error;
pub mod types;

pub use error::{OpenAIError, Result};
pub use types::*;

use reqwest::{Client, Response};
use std::time::Instant;
use tracing::{debug, warn};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

const REQUEST_ID_HEADER: &str = "x-request-id";

#[derive(Clone)]
pub struct OpenAIClient {
    http_client: Client,
    api_key: String,
    base_url: String,
}

impl std::fmt::Debug for OpenAIClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAIClient")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl OpenAIClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }

    /// Read the key from `OPENAI_API_KEY`.
    pub fn from_env() -> Result<Self> {
        match std::env::var("OPENAI_API_KEY") {
            Ok(key) if !key.trim().is_empty() => Ok(Self::new(key)),
            _ => Err(OpenAIError::Config("OPENAI_API_KEY not set".into())),
        }
    }

    /// Point at a compatible server (Azure, a proxy, a local mock).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Use a preconfigured HTTP client (timeouts, proxies).
    pub fn with_http_client(mut self, client: Client) -> Self {
        self.http_client = client;
        self
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Issue one chat completion and return its first choice.
    pub async fn chat_completion(&self, request: ChatRequest) -> Result<ChatResponse> {
        let started = Instant::now();

        let response = self
            .http_client
            .post(self.endpoint("chat/completions"))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, model = %request.model, "OpenAI request failed");
                OpenAIError::Network(e.to_string())
            })?;

        let request_id = request_id(&response);
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = api_error_message(&body);
            warn!(
                status = status.as_u16(),
                request_id = request_id.as_deref().unwrap_or("-"),
                error = %message,
                "OpenAI API error"
            );
            return Err(OpenAIError::from_status(status, message));
        }

        let envelope: CompletionEnvelope = response
            .json()
            .await
            .map_err(|e| OpenAIError::Parse(e.to_string()))?;
        let completion = envelope
            .into_response()
            .ok_or_else(|| OpenAIError::Parse("No choices in OpenAI response".into()))?;

        debug!(
            model = %request.model,
            request_id = request_id.as_deref().unwrap_or("-"),
            json = request.wants_json(),
            finish_reason = completion.finish_reason.as_deref().unwrap_or("-"),
            total_tokens = completion.usage.map(|u| u.total_tokens),
            duration_ms = started.elapsed().as_millis() as u64,
            "OpenAI chat completion"
        );

        Ok(completion)
    }
}

fn request_id(response: &Response) -> Option<String> {
    response
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}
