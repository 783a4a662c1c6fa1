//! Web page text extraction with reqwest and scraper.
//!
//! No JavaScript rendering: only the text present in the served HTML is
//! seen.

use scraper::{Html, Node};
use std::time::Duration;
use tracing::{debug, warn};
use url::Url;

use crate::config::DEFAULT_HTTP_TIMEOUT_SECS;
use crate::error::{ExtractionError, ExtractionResult};
use crate::utils::add_http_if_missing;

/// Elements whose text never reaches the page reader.
const SKIPPED_ELEMENTS: &[&str] = &["script", "style", "noscript"];

const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Fetches a page and flattens its visible text.
#[derive(Debug, Clone)]
pub struct HttpExtractor {
    client: reqwest::Client,
}

impl HttpExtractor {
    pub fn new() -> ExtractionResult<Self> {
        Self::with_timeout(Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS))
    }

    pub fn with_timeout(timeout: Duration) -> ExtractionResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;
        Ok(Self { client })
    }

    /// Use a preconfigured HTTP client.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Fetch `url` (scheme optional) and return its text.
    pub async fn fetch_text(&self, url: &str) -> ExtractionResult<String> {
        let url = Url::parse(&add_http_if_missing(url))?;
        debug!(url = %url, "HTTP fetch starting");

        let http_error = |reason: String| ExtractionError::Http {
            url: url.to_string(),
            reason,
        };

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| {
                warn!(url = %url, error = %e, "HTTP request failed");
                http_error(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(http_error(format!("HTTP {}", status)));
        }

        let html = response
            .text()
            .await
            .map_err(|e| http_error(format!("failed to read body: {}", e)))?;

        let text = html_to_text(&html);
        debug!(url = %url, chars = text.len(), "HTTP fetch complete");
        Ok(text)
    }
}

/// Visible text of an HTML document, text nodes joined by single spaces.
pub fn html_to_text(html: &str) -> String {
    let document = Html::parse_document(html);

    let parts: Vec<&str> = document
        .tree
        .root()
        .descendants()
        .filter_map(|node| {
            let text = node.value().as_text()?;
            let hidden = node.ancestors().any(|ancestor| match ancestor.value() {
                Node::Element(element) => SKIPPED_ELEMENTS.contains(&element.name()),
                _ => false,
            });
            if hidden {
                return None;
            }
            let trimmed = text.trim();
            (!trimmed.is_empty()).then_some(trimmed)
        })
        .collect();

    parts.join(" ")
}
