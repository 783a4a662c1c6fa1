//! Sequential dispatch of one channel's requests.
//!
//! Every request is awaited before the next is issued. Each request
//! contributes exactly `expected_count` records, real or placeholder, with one
//! exception: a rejected credential contributes a single placeholder and ends
//! the channel.

use std::time::Instant;

use tracing::debug;

use super::normalize::{normalize_items, parse_items, placeholder_batch};
use crate::error::FailureKind;
use crate::traits::chat::ChatBackend;
use crate::types::channel::Channel;
use crate::types::record::{AdRecord, PlaceholderSlot};
use crate::types::request::RequestSpec;
use crate::types::run::StatusLog;

/// Records produced for one channel plus how the dispatch went.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelOutcome {
    pub channel: Channel,
    pub records: Vec<AdRecord>,
    /// Requests that produced no usable response
    pub failed_requests: usize,
    /// Requests never issued because the credential was rejected
    pub skipped_requests: usize,
}

impl ChannelOutcome {
    pub fn halted(&self) -> bool {
        self.skipped_requests > 0
            || self
                .records
                .last()
                .is_some_and(|r| r.failure() == Some(FailureKind::Auth))
    }
}

/// Issues requests against a chat backend one at a time.
pub struct Dispatcher<'a, C: ChatBackend + ?Sized> {
    backend: &'a C,
    model: &'a str,
}

impl<'a, C: ChatBackend + ?Sized> Dispatcher<'a, C> {
    pub fn new(backend: &'a C, model: &'a str) -> Self {
        Self { backend, model }
    }

    /// Run every request of one channel in order.
    pub async fn dispatch_channel(
        &self,
        channel: Channel,
        requests: &[RequestSpec],
        log: &mut StatusLog,
    ) -> ChannelOutcome {
        let total = requests.len();
        let mut outcome = ChannelOutcome {
            channel,
            records: Vec::with_capacity(requests.iter().map(|r| r.expected_count).sum()),
            failed_requests: 0,
            skipped_requests: 0,
        };

        for (index, spec) in requests.iter().enumerate() {
            let call = index + 1;
            let label = match spec.stage {
                Some(stage) => format!("{} (API call {}/{})", stage.label(), call, total),
                None => format!("API call {}/{}", call, total),
            };
            log.info(Some(channel), format!("Generating {} ads: {}", channel, label));

            let started = Instant::now();
            let response = self.backend.complete(spec.to_chat_request(self.model)).await;
            debug!(
                channel = channel.label(),
                call,
                duration_ms = started.elapsed().as_millis() as u64,
                "generation call returned"
            );

            let content = match response {
                Ok(response) => {
                    if response.is_truncated() {
                        log.warning(
                            Some(channel),
                            format!("{}: response was cut off at the token limit", label),
                        );
                    }
                    response.content
                }
                Err(err) => {
                    let kind = FailureKind::from(&err);
                    outcome.failed_requests += 1;

                    if kind.halts_channel() {
                        log.error(
                            Some(channel),
                            format!(
                                "{}: {}. The API key was rejected; halting generation for {}.",
                                label, err, channel
                            ),
                        );
                        outcome.records.push(AdRecord::placeholder(
                            spec.schema(),
                            kind,
                            PlaceholderSlot {
                                call,
                                stage: spec.stage,
                                variant: 1,
                                batch: 1,
                            },
                        ));
                        outcome.skipped_requests = total - call;
                        if outcome.skipped_requests > 0 {
                            log.warning(
                                Some(channel),
                                format!(
                                    "Skipped {} remaining request(s) after authentication failure",
                                    outcome.skipped_requests
                                ),
                            );
                        }
                        break;
                    }

                    log.error(Some(channel), format!("{}: {} ({})", label, kind.message(), err));
                    outcome.records.extend(placeholder_batch(spec, call, kind));
                    continue;
                }
            };

            let items = match parse_items(&content, spec.root_key) {
                Ok(items) => items,
                Err(err) => {
                    outcome.failed_requests += 1;
                    log.error(Some(channel), format!("{}: {}", label, err));
                    outcome.records.extend(placeholder_batch(spec, call, err.kind()));
                    continue;
                }
            };

            let batch = normalize_items(spec, call, &items);
            if batch.malformed > 0 {
                log.warning(
                    Some(channel),
                    format!("{}: {} item(s) were not JSON objects", label, batch.malformed),
                );
            }
            if batch.dropped > 0 {
                log.warning(
                    Some(channel),
                    format!(
                        "{}: expected {} ads, got {}; extra items dropped",
                        label,
                        spec.expected_count,
                        items.len()
                    ),
                );
            }
            if batch.padded > 0 {
                log.warning(
                    Some(channel),
                    format!(
                        "{}: expected {} ads, got {}; padded with placeholders",
                        label,
                        spec.expected_count,
                        items.len()
                    ),
                );
            }
            if batch.cleared_descriptions > 0 {
                log.warning(
                    Some(channel),
                    format!(
                        "{}: cleared {} description(s) beyond the first {}",
                        label,
                        batch.cleared_descriptions,
                        spec.schema().blank_description_from.unwrap_or_default()
                    ),
                );
            }
            log.info(
                Some(channel),
                format!("{} complete: {} ad(s)", label, batch.records.len()),
            );
            outcome.records.extend(batch.records);
        }

        outcome
    }
}
