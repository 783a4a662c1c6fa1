//! Memoized summarization of acquired source text.
//!
//! Failures never propagate: a failed call yields a short string starting
//! with [`SUMMARY_ERROR_PREFIX`] that flows into prompts and the report like
//! any other summary. Error strings are not cached, so a later call can
//! recover.

use std::collections::HashMap;
use std::sync::RwLock;

use openai_client::{ChatRequest, Message, OpenAIError};
use sha2::{Digest, Sha256};
use tracing::{debug, info, warn};

use crate::traits::chat::ChatBackend;

/// Marker every in-band summarization failure starts with.
pub const SUMMARY_ERROR_PREFIX: &str = "Error";

/// Default summary length in characters.
pub const DEFAULT_TARGET_CHARS: usize = 2500;

/// Average characters per token used to size the completion cap.
const CHARS_PER_TOKEN: f64 = 3.5;

const TEMPERATURE: f32 = 0.3;

const SYSTEM_PROMPT: &str = "You are an expert summarization AI.";

/// Whether a summary is an in-band failure string.
pub fn is_degraded(summary: &str) -> bool {
    summary.starts_with(SUMMARY_ERROR_PREFIX)
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    model: String,
    target_chars: usize,
    digest: String,
}

/// Summarizer bound to one backend and model, caching per session.
pub struct Summarizer<C: ChatBackend> {
    backend: C,
    model: String,
    target_chars: usize,
    cache: RwLock<HashMap<CacheKey, String>>,
}

impl<C: ChatBackend> Summarizer<C> {
    pub fn new(backend: C, model: impl Into<String>) -> Self {
        Self {
            backend,
            model: model.into(),
            target_chars: DEFAULT_TARGET_CHARS,
            cache: RwLock::new(HashMap::new()),
        }
    }

    /// Set the default summary length.
    pub fn with_target_chars(mut self, target_chars: usize) -> Self {
        self.target_chars = target_chars;
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn target_chars(&self) -> usize {
        self.target_chars
    }

    /// Summarize to the default length.
    pub async fn summarize(&self, text: &str) -> String {
        self.summarize_to(text, self.target_chars).await
    }

    /// Summarize to approximately `target_chars`, reusing a cached result.
    pub async fn summarize_to(&self, text: &str, target_chars: usize) -> String {
        if text.trim().is_empty() {
            return String::new();
        }

        let key = self.cache_key(text, target_chars);
        if let Some(hit) = self.cached(&key) {
            debug!(chars = hit.len(), "summary cache hit");
            return hit;
        }

        let summary = self.call(text, target_chars).await;
        if !is_degraded(&summary) {
            self.store(key, summary.clone());
        }
        summary
    }

    /// Summarize without consulting the cache. The result still replaces any
    /// cached entry.
    pub async fn summarize_fresh(&self, text: &str) -> String {
        if text.trim().is_empty() {
            return String::new();
        }
        let summary = self.call(text, self.target_chars).await;
        if !is_degraded(&summary) {
            self.store(self.cache_key(text, self.target_chars), summary.clone());
        }
        summary
    }

    /// Drop every cached summary.
    pub fn clear(&self) {
        match self.cache.write() {
            Ok(mut cache) => cache.clear(),
            Err(poisoned) => poisoned.into_inner().clear(),
        }
    }

    /// Number of cached summaries.
    pub fn cached_count(&self) -> usize {
        match self.cache.read() {
            Ok(cache) => cache.len(),
            Err(poisoned) => poisoned.into_inner().len(),
        }
    }

    fn cache_key(&self, text: &str, target_chars: usize) -> CacheKey {
        let mut hasher = Sha256::new();
        hasher.update(text.as_bytes());
        CacheKey {
            model: self.model.clone(),
            target_chars,
            digest: format!("{:x}", hasher.finalize()),
        }
    }

    fn cached(&self, key: &CacheKey) -> Option<String> {
        match self.cache.read() {
            Ok(cache) => cache.get(key).cloned(),
            Err(poisoned) => poisoned.into_inner().get(key).cloned(),
        }
    }

    fn store(&self, key: CacheKey, summary: String) {
        match self.cache.write() {
            Ok(mut cache) => {
                cache.insert(key, summary);
            }
            Err(poisoned) => {
                poisoned.into_inner().insert(key, summary);
            }
        }
    }

    async fn call(&self, text: &str, target_chars: usize) -> String {
        let request = ChatRequest::new(&self.model)
            .message(Message::system(SYSTEM_PROMPT))
            .message(Message::user(format!(
                "Summarize this text to approximately {} characters:\n\n{}",
                target_chars, text
            )))
            .temperature(TEMPERATURE)
            .token_cap(token_cap(target_chars));

        match self.backend.complete(request).await {
            Ok(response) => {
                let summary = response.content.trim().to_string();
                info!(
                    input_chars = text.chars().count(),
                    chars = summary.chars().count(),
                    "summarized source text"
                );
                summary
            }
            Err(err) => {
                warn!(error = %err, "summarization failed");
                degraded_summary(&err)
            }
        }
    }
}

/// Completion token cap for a target length.
pub fn token_cap(target_chars: usize) -> u32 {
    ((target_chars as f64 / CHARS_PER_TOKEN).floor() as u32).max(1)
}

fn degraded_summary(err: &OpenAIError) -> String {
    match err {
        OpenAIError::Auth(_) => "Error: OpenAI Authentication Failed.".to_string(),
        OpenAIError::RateLimit(_) => "Error: OpenAI Rate Limit Exceeded.".to_string(),
        OpenAIError::BadRequest(detail) => format!("Error: OpenAI Invalid Request - {}.", detail),
        other => format!("Error during summarization: {}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockChat;
    use std::sync::Arc;

    #[test]
    fn test_token_cap() {
        assert_eq!(token_cap(2500), 714);
        assert_eq!(token_cap(7), 2);
        assert_eq!(token_cap(0), 1);
    }

    #[tokio::test]
    async fn test_empty_text_makes_no_call() {
        let chat = Arc::new(MockChat::new());
        let summarizer = Summarizer::new(chat.clone(), "gpt-4.1-mini");

        assert_eq!(summarizer.summarize("   ").await, "");
        assert_eq!(chat.call_count(), 0);
    }

    #[tokio::test]
    async fn test_identical_input_is_cached() {
        let chat = Arc::new(MockChat::new().with_response("A short summary."));
        let summarizer = Summarizer::new(chat.clone(), "gpt-4.1-mini");

        let first = summarizer.summarize("Long article text").await;
        let second = summarizer.summarize("Long article text").await;

        assert_eq!(first, "A short summary.");
        assert_eq!(first, second);
        assert_eq!(chat.call_count(), 1);
        assert_eq!(summarizer.cached_count(), 1);

        let call = &chat.calls()[0];
        assert_eq!(call.temperature, Some(0.3));
        assert_eq!(call.max_tokens, Some(714));
        assert_eq!(call.messages[0].content, "You are an expert summarization AI.");
        assert!(call.messages[1]
            .content
            .starts_with("Summarize this text to approximately 2500 characters:"));
    }

    #[tokio::test]
    async fn test_fresh_and_clear_bypass_cache() {
        let chat = Arc::new(
            MockChat::new()
                .with_response("one")
                .with_response("two")
                .with_response("three"),
        );
        let summarizer = Summarizer::new(chat.clone(), "gpt-4.1-mini");

        assert_eq!(summarizer.summarize("text").await, "one");
        assert_eq!(summarizer.summarize_fresh("text").await, "two");
        assert_eq!(summarizer.summarize("text").await, "two");

        summarizer.clear();
        assert_eq!(summarizer.summarize("text").await, "three");
        assert_eq!(chat.call_count(), 3);
    }

    #[tokio::test]
    async fn test_failures_are_in_band_and_not_cached() {
        let chat = Arc::new(
            MockChat::new()
                .with_error(OpenAIError::Auth("invalid key".into()))
                .with_error(OpenAIError::BadRequest("context too long".into()))
                .with_error(OpenAIError::Network("timed out".into()))
                .with_response("recovered"),
        );
        let summarizer = Summarizer::new(chat.clone(), "gpt-4.1-mini");

        let auth = summarizer.summarize("text").await;
        assert_eq!(auth, "Error: OpenAI Authentication Failed.");
        assert!(is_degraded(&auth));

        let bad = summarizer.summarize("text").await;
        assert_eq!(bad, "Error: OpenAI Invalid Request - context too long.");

        let network = summarizer.summarize("text").await;
        assert!(network.starts_with("Error during summarization:"));

        assert_eq!(summarizer.summarize("text").await, "recovered");
        assert_eq!(chat.call_count(), 4);
    }

    #[tokio::test]
    async fn test_cache_is_per_model() {
        let chat = Arc::new(MockChat::new().with_response("a").with_response("b"));
        let mini = Summarizer::new(chat.clone(), "gpt-4.1-mini");
        let full = Summarizer::new(chat.clone(), "gpt-4.1");

        assert_eq!(mini.summarize("same").await, "a");
        assert_eq!(full.summarize("same").await, "b");
    }
}
