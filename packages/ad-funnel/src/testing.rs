//! Testing utilities including mock implementations.
//!
//! These let applications and tests drive the whole pipeline without any
//! network access: [`MockChat`] stands in for the generation API and
//! [`MockExtractor`] for URL fetching and document parsing.

use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, PoisonError, RwLock};

use openai_client::{ChatRequest, ChatResponse, OpenAIError};
use serde_json::{json, Map, Value};

use crate::error::{ExtractionError, ExtractionResult};
use crate::traits::chat::ChatBackend;
use crate::traits::extractor::TextExtractor;
use crate::types::channel::Channel;
use crate::types::input::Source;

type Responder = Box<dyn Fn(&ChatRequest) -> Result<String, OpenAIError> + Send + Sync>;

/// A scripted chat backend.
///
/// Scripted outcomes are consumed in order. Once the script is exhausted the
/// fallback responder answers; without one, calls fail with an API error.
/// Every request is recorded for assertions.
#[derive(Default)]
pub struct MockChat {
    script: Arc<RwLock<VecDeque<Result<ChatResponse, OpenAIError>>>>,
    fallback: Option<Responder>,
    calls: Arc<RwLock<Vec<ChatRequest>>>,
}

impl MockChat {
    pub fn new() -> Self {
        Self::default()
    }

    /// A mock that honours every output contract it is given.
    ///
    /// Generation prompts get a well-formed list of the requested length under
    /// the requested root key; anything else gets a canned summary.
    pub fn contract_following() -> Self {
        Self::new().with_fallback(|request| Ok(contract_response(request)))
    }

    /// Queue a successful completion.
    pub fn with_response(self, content: impl Into<String>) -> Self {
        write(&self.script).push_back(Ok(ChatResponse::text(content)));
        self
    }

    /// Queue a completion that stopped at the token limit.
    pub fn with_truncated_response(self, content: impl Into<String>) -> Self {
        let mut response = ChatResponse::text(content);
        response.finish_reason = Some("length".to_string());
        write(&self.script).push_back(Ok(response));
        self
    }

    /// Queue a failed completion.
    pub fn with_error(self, error: OpenAIError) -> Self {
        write(&self.script).push_back(Err(error));
        self
    }

    /// Answer calls once the script is exhausted.
    pub fn with_fallback(
        mut self,
        responder: impl Fn(&ChatRequest) -> Result<String, OpenAIError> + Send + Sync + 'static,
    ) -> Self {
        self.fallback = Some(Box::new(responder));
        self
    }

    /// Get all requests made to this mock.
    pub fn calls(&self) -> Vec<ChatRequest> {
        read(&self.calls).clone()
    }

    pub fn call_count(&self) -> usize {
        read(&self.calls).len()
    }

    /// Clear call history.
    pub fn clear_calls(&self) {
        write(&self.calls).clear();
    }
}

#[async_trait]
impl ChatBackend for MockChat {
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse, OpenAIError> {
        write(&self.calls).push(request.clone());

        let scripted = write(&self.script).pop_front();
        match scripted {
            Some(outcome) => outcome,
            None => match &self.fallback {
                Some(responder) => responder(&request).map(ChatResponse::text),
                None => Err(OpenAIError::Api {
                    status: 500,
                    message: "no scripted response".into(),
                }),
            },
        }
    }
}

/// Build a response that satisfies the prompt's output contract.
///
/// The root key and item count are read back from the contract sentence; each
/// item carries every field any channel uses, and the parser keeps the ones
/// its schema knows.
pub fn contract_response(request: &ChatRequest) -> String {
    let prompt = request
        .messages
        .iter()
        .rev()
        .find(|m| m.role == "user")
        .map(|m| m.content.as_str())
        .unwrap_or_default();

    let Some((root_key, count)) = read_contract(prompt) else {
        return format!("Summary of {} characters of source text.", prompt.len());
    };

    let items: Vec<Value> = (1..=count)
        .map(|i| {
            let mut item = Map::new();
            for channel in Channel::ALL {
                for field in channel.schema().fields {
                    item.entry(field.to_string())
                        .or_insert_with(|| json!(format!("{} {}", field, i)));
                }
            }
            Value::Object(item)
        })
        .collect();

    let mut root = Map::new();
    root.insert(root_key, Value::Array(items));
    Value::Object(root).to_string()
}

fn read_contract(prompt: &str) -> Option<(String, usize)> {
    let after_key = prompt.split("The root key MUST be \"").nth(1)?;
    let root_key = after_key.split('"').next()?.to_string();
    let after_count = after_key.split("a list of exactly ").nth(1)?;
    let count = after_count.split_whitespace().next()?.parse().ok()?;
    Some((root_key, count))
}

/// A mock text extractor with predefined text per source.
#[derive(Default)]
pub struct MockExtractor {
    texts: Arc<RwLock<HashMap<String, String>>>,
    failures: Arc<RwLock<HashMap<String, String>>>,
    calls: Arc<RwLock<Vec<String>>>,
}

impl MockExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Text returned for a URL or document name.
    pub fn with_text(self, source: impl Into<String>, text: impl Into<String>) -> Self {
        write(&self.texts).insert(source.into(), text.into());
        self
    }

    /// Make extraction of a URL or document name fail.
    pub fn with_failure(self, source: impl Into<String>, reason: impl Into<String>) -> Self {
        write(&self.failures).insert(source.into(), reason.into());
        self
    }

    /// Sources extracted so far, by URL or document name.
    pub fn calls(&self) -> Vec<String> {
        read(&self.calls).clone()
    }
}

#[async_trait]
impl TextExtractor for MockExtractor {
    async fn extract(&self, source: &Source) -> ExtractionResult<String> {
        let key = match source {
            Source::Url(url) => url.clone(),
            Source::Document(document) => document.name.clone(),
        };
        write(&self.calls).push(key.clone());

        if let Some(reason) = read(&self.failures).get(&key) {
            return Err(match source {
                Source::Url(url) => ExtractionError::Http {
                    url: url.clone(),
                    reason: reason.clone(),
                },
                Source::Document(document) => ExtractionError::Document {
                    name: document.name.clone(),
                    reason: reason.clone(),
                },
            });
        }

        Ok(read(&self.texts).get(&key).cloned().unwrap_or_default())
    }
}

fn read<T>(lock: &RwLock<T>) -> std::sync::RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> std::sync::RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}
