//! Funnel Ad-Copy Generation Library
//!
//! Turns a company's web page and uploaded documents into marketing copy for
//! five channels, organised by funnel stage, plus a transparency report of
//! the source text the copy was generated from.
//!
//! # Pipeline
//!
//! 1. **Acquire** raw text from the client URL, the additional-context upload
//!    and the lead magnet. Unreadable sources contribute empty text.
//! 2. **Summarize** each non-empty text once per session.
//! 3. **Generate**: for each channel, build its request sequence and issue
//!    the calls one at a time. Every response is parsed against the channel's
//!    schema; failures become placeholder records so each channel keeps its
//!    mandated cardinality.
//! 4. **Export** the DOCX transparency report and the XLSX ad workbook.
//!
//! # Usage
//!
//! ```rust,ignore
//! use ad_funnel::{CampaignInput, Config, FunnelGenerator, FunnelObjective};
//!
//! let config = Config::from_env()?;
//! let generator = FunnelGenerator::from_config(&config)?;
//!
//! let input = CampaignInput::new("Acme Robotics", "https://acme.test/book")
//!     .with_client_url("acme.test")
//!     .with_objective(FunnelObjective::DemoBooking);
//!
//! let result = generator.run(&input).await?;
//! for artifact in result.artifacts() {
//!     std::fs::write(&artifact.file_name, &artifact.bytes)?;
//! }
//! ```
//!
//! # Modules
//!
//! - [`types`] - Channels, schemas, records, inputs and run results
//! - [`prompts`] - Per-channel request builders
//! - [`pipeline`] - Acquisition, summarization, dispatch and orchestration
//! - [`extractors`] - URL and document text extraction
//! - [`report`] - DOCX and XLSX export
//! - [`testing`] - Mock chat backend and extractor

pub mod config;
pub mod error;
pub mod extractors;
pub mod pipeline;
pub mod prompts;
pub mod report;
pub mod security;
pub mod testing;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export core types at crate root
pub use config::Config;
pub use error::{ConfigError, ExtractionError, FailureKind, FunnelError, InputError, ReportError};
pub use extractors::ContentExtractor;
pub use pipeline::{ChannelOutcome, Dispatcher, FunnelGenerator, Summarizer};
pub use prompts::{build_requests, PromptContext, PromptInputs};
pub use security::{ApiCredentials, SecretString};
pub use traits::{chat::ChatBackend, extractor::TextExtractor};
pub use types::{
    channel::{Channel, ChannelSchema, FunnelObjective, FunnelStage},
    input::{CampaignInput, CampaignLinks, ContentCount, Document, Source},
    record::AdRecord,
    request::RequestSpec,
    run::{
        Artifact, GenerationRun, Provenance, RunResult, SourceText, StatusEvent, StatusLevel,
        StatusLog,
    },
};
