use dotenvy::dotenv;
use std::env;
use std::time::Duration;

use crate::error::ConfigError;
use crate::pipeline::summarize::DEFAULT_TARGET_CHARS;
use crate::security::ApiCredentials;

pub const DEFAULT_MODEL: &str = "gpt-4.1-mini";
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

/// Deployment configuration loaded from environment variables
#[derive(Debug, Clone)]
pub struct Config {
    pub credentials: ApiCredentials,
    /// Target summary length in characters
    pub summary_chars: usize,
    /// Timeout for fetching the client URL
    pub http_timeout: Duration,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        let _ = dotenv();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration from any variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_key = lookup("OPENAI_API_KEY").ok_or(ConfigError::Missing("OPENAI_API_KEY"))?;
        let model = lookup("OPENAI_MODEL")
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let mut credentials = ApiCredentials::new(api_key, model)?;
        if let Some(url) = lookup("OPENAI_BASE_URL").filter(|u| !u.trim().is_empty()) {
            credentials = credentials.with_base_url(url);
        }

        let summary_chars = parse_or("FUNNEL_SUMMARY_CHARS", &lookup, DEFAULT_TARGET_CHARS)?;
        if summary_chars == 0 {
            return Err(ConfigError::Invalid {
                name: "FUNNEL_SUMMARY_CHARS",
                reason: "must be greater than zero".into(),
            });
        }
        let timeout_secs = parse_or("FUNNEL_HTTP_TIMEOUT_SECS", &lookup, DEFAULT_HTTP_TIMEOUT_SECS)?;

        Ok(Self {
            credentials,
            summary_chars,
            http_timeout: Duration::from_secs(timeout_secs),
        })
    }

    pub fn model(&self) -> &str {
        &self.credentials.model
    }
}

fn parse_or<T>(
    name: &'static str,
    lookup: &impl Fn(&str) -> Option<String>,
    default: T,
) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            name,
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}
