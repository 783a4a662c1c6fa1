//! Credential handling with secure memory.
//!
//! Uses the `secrecy` crate to prevent accidental logging of sensitive values.

use secrecy::{ExposeSecret, SecretBox};
use std::fmt;

use openai_client::OpenAIClient;

use crate::error::ConfigError;

/// Value shipped in the deployment template; never a usable key.
pub const PLACEHOLDER_API_KEY: &str = "your_openai_api_key_here";

/// A secret string that won't be logged or displayed.
pub struct SecretString(SecretBox<str>);

impl SecretString {
    pub fn new(value: impl Into<String>) -> Self {
        Self(SecretBox::new(Box::from(value.into().as_str())))
    }

    /// Expose the secret value for use.
    ///
    /// Only call this when actually using the secret (building the client).
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }
}

impl Clone for SecretString {
    fn clone(&self) -> Self {
        Self::new(self.expose().to_string())
    }
}

impl fmt::Debug for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl fmt::Display for SecretString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl From<String> for SecretString {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for SecretString {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

/// Generation-API credentials: key, model and optional endpoint override.
#[derive(Clone)]
pub struct ApiCredentials {
    pub api_key: SecretString,
    pub model: String,
    pub base_url: Option<String>,
}

impl ApiCredentials {
    /// Credentials for `model`, rejecting a blank or placeholder key.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Result<Self, ConfigError> {
        let api_key = api_key.into();
        let trimmed = api_key.trim();
        if trimmed.is_empty() {
            return Err(ConfigError::Missing("OPENAI_API_KEY"));
        }
        if trimmed == PLACEHOLDER_API_KEY {
            return Err(ConfigError::Placeholder("OPENAI_API_KEY"));
        }
        Ok(Self {
            api_key: SecretString::new(trimmed),
            model: model.into(),
            base_url: None,
        })
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Build the REST client these credentials authorize.
    pub fn client(&self) -> OpenAIClient {
        let client = OpenAIClient::new(self.api_key.expose());
        match &self.base_url {
            Some(url) => client.with_base_url(url.as_str()),
            None => client,
        }
    }
}

impl fmt::Debug for ApiCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ApiCredentials")
            .field("api_key", &"[REDACTED]")
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secret_not_in_debug_or_display() {
        let secret = SecretString::new("sk-super-secret-key");
        assert_eq!(format!("{:?}", secret), "[REDACTED]");
        assert_eq!(format!("{}", secret), "[REDACTED]");
        assert_eq!(secret.expose(), "sk-super-secret-key");
    }

    #[test]
    fn test_placeholder_key_rejected() {
        assert!(matches!(
            ApiCredentials::new("your_openai_api_key_here", "gpt-4.1-mini"),
            Err(ConfigError::Placeholder(_))
        ));
        assert!(matches!(
            ApiCredentials::new("  ", "gpt-4.1-mini"),
            Err(ConfigError::Missing(_))
        ));
    }

    #[test]
    fn test_credentials_build_client() {
        let creds = ApiCredentials::new("sk-secret", "gpt-4.1-mini")
            .unwrap()
            .with_base_url("http://localhost:8080/v1/");
        let debug = format!("{:?}", creds);
        assert!(!debug.contains("sk-secret"));
        assert!(debug.contains("gpt-4.1-mini"));

        let client = creds.client();
        assert_eq!(client.api_key(), "sk-secret");
        assert_eq!(client.base_url(), "http://localhost:8080/v1");
    }
}
