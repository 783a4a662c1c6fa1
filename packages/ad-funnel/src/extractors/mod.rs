//! Production text extractors.

pub mod document;
pub mod http;

pub use document::{DocumentExtractor, DocumentKind};
pub use http::{html_to_text, HttpExtractor};

use async_trait::async_trait;
use std::time::Duration;

use crate::error::ExtractionResult;
use crate::traits::extractor::TextExtractor;
use crate::types::input::Source;

/// Routes URLs to [`HttpExtractor`] and uploads to [`DocumentExtractor`].
#[derive(Debug, Clone)]
pub struct ContentExtractor {
    http: HttpExtractor,
    documents: DocumentExtractor,
}

impl ContentExtractor {
    pub fn new(http_timeout: Duration) -> ExtractionResult<Self> {
        Ok(Self {
            http: HttpExtractor::with_timeout(http_timeout)?,
            documents: DocumentExtractor::new(),
        })
    }
}

#[async_trait]
impl TextExtractor for ContentExtractor {
    async fn extract(&self, source: &Source) -> ExtractionResult<String> {
        match source {
            Source::Url(url) => self.http.fetch_text(url).await,
            Source::Document(document) => self.documents.extract_text(document).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExtractionError;
    use crate::types::input::Document;

    #[tokio::test]
    async fn test_unsupported_upload_is_rejected() {
        let extractor = ContentExtractor::new(Duration::from_secs(1)).unwrap();
        let err = extractor
            .extract(&Source::Document(Document::new("brief.txt", b"hello".to_vec())))
            .await
            .unwrap_err();
        assert!(matches!(err, ExtractionError::UnsupportedFormat(_)));
    }
}
