//! Text extractor trait.
//!
//! Extractors turn a [`Source`] into plain text. They may fail; the
//! acquisition step in the pipeline converts failures into empty text.

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::ExtractionResult;
use crate::types::input::Source;

/// Pulls raw text out of a URL or an uploaded document.
#[async_trait]
pub trait TextExtractor: Send + Sync {
    async fn extract(&self, source: &Source) -> ExtractionResult<String>;
}

#[async_trait]
impl<T: TextExtractor + ?Sized> TextExtractor for Arc<T> {
    async fn extract(&self, source: &Source) -> ExtractionResult<String> {
        (**self).extract(source).await
    }
}
