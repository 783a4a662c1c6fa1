//! Validated campaign inputs and text sources.

use std::fmt;

use super::channel::FunnelObjective;
use crate::error::InputError;

/// Number of variations requested per stage, in `[1, 20]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ContentCount(u32);

impl ContentCount {
    pub const MIN: u32 = 1;
    pub const MAX: u32 = 20;

    pub fn new(value: u32) -> Result<Self, InputError> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(InputError::ContentCountOutOfRange {
                got: value,
                min: Self::MIN,
                max: Self::MAX,
            })
        }
    }

    pub fn get(&self) -> usize {
        self.0 as usize
    }
}

impl Default for ContentCount {
    fn default() -> Self {
        Self(3)
    }
}

impl TryFrom<u32> for ContentCount {
    type Error = InputError;

    fn try_from(value: u32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl fmt::Display for ContentCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Destination links used in CTAs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CampaignLinks {
    /// "Learn More" page (Brand Awareness)
    pub learn_more: String,
    /// Lead magnet download page (Demand Gen)
    pub lead_magnet: String,
    /// Demo booking or sales meeting page (Demand Capture, Email)
    pub booking: String,
}

/// An uploaded document.
#[derive(Clone, PartialEq, Eq)]
pub struct Document {
    /// Original file name; its extension selects the reader
    pub name: String,
    pub bytes: Vec<u8>,
}

impl Document {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("name", &self.name)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

/// Where raw text comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    Url(String),
    Document(Document),
}

impl Source {
    /// Short description for status messages.
    pub fn describe(&self) -> String {
        match self {
            Self::Url(url) => format!("URL {}", url),
            Self::Document(doc) => format!("file {}", doc.name),
        }
    }
}

/// Everything one generation run needs from the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CampaignInput {
    pub company_name: String,
    pub client_url: Option<String>,
    /// Additional company context (PDF or PPTX)
    pub additional_context: Option<Document>,
    /// Lead magnet (PDF)
    pub lead_magnet: Option<Document>,
    pub objective: FunnelObjective,
    pub links: CampaignLinks,
    pub content_count: ContentCount,
}

impl CampaignInput {
    /// Start from the two required values; everything else defaults.
    pub fn new(company_name: impl Into<String>, booking_link: impl Into<String>) -> Self {
        Self {
            company_name: company_name.into(),
            client_url: None,
            additional_context: None,
            lead_magnet: None,
            objective: FunnelObjective::default(),
            links: CampaignLinks {
                booking: booking_link.into(),
                ..Default::default()
            },
            content_count: ContentCount::default(),
        }
    }

    pub fn with_client_url(mut self, url: impl Into<String>) -> Self {
        let url = url.into();
        self.client_url = (!url.trim().is_empty()).then_some(url);
        self
    }

    pub fn with_additional_context(mut self, document: Document) -> Self {
        self.additional_context = Some(document);
        self
    }

    pub fn with_lead_magnet(mut self, document: Document) -> Self {
        self.lead_magnet = Some(document);
        self
    }

    pub fn with_objective(mut self, objective: FunnelObjective) -> Self {
        self.objective = objective;
        self
    }

    pub fn with_learn_more_link(mut self, link: impl Into<String>) -> Self {
        self.links.learn_more = link.into();
        self
    }

    pub fn with_lead_magnet_link(mut self, link: impl Into<String>) -> Self {
        self.links.lead_magnet = link.into();
        self
    }

    pub fn with_content_count(mut self, count: ContentCount) -> Self {
        self.content_count = count;
        self
    }

    /// Check the required fields.
    pub fn validate(&self) -> Result<(), InputError> {
        if self.company_name.trim().is_empty() {
            return Err(InputError::MissingCompanyName);
        }
        if self.links.booking.trim().is_empty() {
            return Err(InputError::MissingBookingLink);
        }
        Ok(())
    }
}
