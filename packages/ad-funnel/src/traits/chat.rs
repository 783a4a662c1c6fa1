//! Chat backend trait: the generation-API boundary.
//!
//! The summarizer and dispatcher only need "send this chat request, get the
//! completion text or a classified failure". Keeping that behind a trait lets
//! tests script responses without network access.

use async_trait::async_trait;
use openai_client::{ChatRequest, ChatResponse, OpenAIClient, OpenAIError};
use std::sync::Arc;

/// Chat-completion capability.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Issue one chat completion.
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse, OpenAIError>;
}

#[async_trait]
impl ChatBackend for OpenAIClient {
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse, OpenAIError> {
        self.chat_completion(request).await
    }
}

#[async_trait]
impl<T: ChatBackend + ?Sized> ChatBackend for Arc<T> {
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse, OpenAIError> {
        (**self).complete(request).await
    }
}

#[async_trait]
impl<T: ChatBackend + ?Sized> ChatBackend for &T {
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse, OpenAIError> {
        (**self).complete(request).await
    }
}
