//! The generation pipeline: acquire, summarize, dispatch, normalize.
//!
//! Every step is awaited in sequence; nothing here runs concurrently.

pub mod acquire;
pub mod dispatch;
pub mod generator;
pub mod normalize;
pub mod summarize;

pub use acquire::{acquire, acquire_optional};
pub use dispatch::{ChannelOutcome, Dispatcher};
pub use generator::FunnelGenerator;
pub use normalize::{normalize_items, parse_items, placeholder_batch, NormalizedBatch, ResponseError};
pub use summarize::{is_degraded, Summarizer, DEFAULT_TARGET_CHARS, SUMMARY_ERROR_PREFIX};
