//! Source acquisition: extraction failures become empty text.

use tracing::debug;

use crate::traits::extractor::TextExtractor;
use crate::types::input::Source;
use crate::types::run::StatusLog;

/// Extract text from a source, reporting failures as status events.
///
/// Never fails: an unreadable source contributes empty text and one error
/// event, and the run continues without it.
pub async fn acquire<E: TextExtractor + ?Sized>(
    extractor: &E,
    source: &Source,
    log: &mut StatusLog,
) -> String {
    log.info(None, format!("Extracting text from {}", source.describe()));

    match extractor.extract(source).await {
        Ok(text) => {
            let text = text.trim().to_string();
            let chars = text.chars().count();
            debug!(source = %source.describe(), chars, "extracted text");
            if text.is_empty() {
                log.warning(None, format!("No text found in {}", source.describe()));
            } else {
                log.info(
                    None,
                    format!("Extracted {} characters from {}", chars, source.describe()),
                );
            }
            text
        }
        Err(err) => {
            log.error(
                None,
                format!("Could not extract text from {}: {}", source.describe(), err),
            );
            String::new()
        }
    }
}

/// Acquire an optional source; absent sources yield empty text silently.
pub async fn acquire_optional<E: TextExtractor + ?Sized>(
    extractor: &E,
    source: Option<Source>,
    log: &mut StatusLog,
) -> String {
    match source {
        Some(source) => acquire(extractor, &source, log).await,
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockExtractor;
    use crate::types::input::Document;
    use crate::types::run::StatusLevel;

    #[tokio::test]
    async fn test_failure_becomes_empty_text() {
        let extractor = MockExtractor::new().with_failure("deck.pptx", "corrupt archive");
        let mut log = StatusLog::new();

        let text = acquire(
            &extractor,
            &Source::Document(Document::new("deck.pptx", vec![1, 2, 3])),
            &mut log,
        )
        .await;

        assert_eq!(text, "");
        let errors: Vec<_> = log.errors().collect();
        assert_eq!(errors.len(), 1);
        assert!(errors[0].message.contains("file deck.pptx"));
        assert!(errors[0].message.contains("corrupt archive"));
    }

    #[tokio::test]
    async fn test_success_is_trimmed_and_logged() {
        let extractor = MockExtractor::new().with_text("https://acme.test", "  Acme rockets \n");
        let mut log = StatusLog::new();

        let text = acquire(&extractor, &Source::Url("https://acme.test".into()), &mut log).await;

        assert_eq!(text, "Acme rockets");
        assert!(log
            .events()
            .iter()
            .any(|e| e.level == StatusLevel::Info && e.message.contains("Extracted 12 characters")));
    }

    #[tokio::test]
    async fn test_absent_source_is_silent() {
        let extractor = MockExtractor::new();
        let mut log = StatusLog::new();

        assert_eq!(acquire_optional(&extractor, None, &mut log).await, "");
        assert!(log.events().is_empty());
        assert!(extractor.calls().is_empty());
    }
}
