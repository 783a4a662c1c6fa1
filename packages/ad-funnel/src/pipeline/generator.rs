//! One end-to-end generation run.

use std::sync::Arc;
use std::time::Instant;

use openai_client::OpenAIClient;
use tracing::info;

use super::acquire::acquire_optional;
use super::dispatch::Dispatcher;
use super::summarize::{is_degraded, Summarizer};
use crate::config::Config;
use crate::error::{ExtractionError, FunnelError};
use crate::extractors::ContentExtractor;
use crate::prompts::{build_requests, PromptContext, PromptInputs};
use crate::report;
use crate::traits::chat::ChatBackend;
use crate::traits::extractor::TextExtractor;
use crate::types::channel::Channel;
use crate::types::input::{CampaignInput, Source};
use crate::types::run::{GenerationRun, Provenance, RunResult, SourceText, StatusLog};

/// Drives acquisition, summarization, generation and export for a campaign.
///
/// The summary cache lives as long as the generator, so repeated runs over
/// the same sources only summarize once.
pub struct FunnelGenerator<C: ChatBackend, E: TextExtractor> {
    chat: Arc<C>,
    extractor: E,
    summarizer: Summarizer<Arc<C>>,
    model: String,
    channels: Vec<Channel>,
}

impl FunnelGenerator<OpenAIClient, ContentExtractor> {
    /// Production generator: OpenAI backend and network/document extractors.
    pub fn from_config(config: &Config) -> Result<Self, ExtractionError> {
        let extractor = ContentExtractor::new(config.http_timeout)?;
        Ok(Self::new(config.credentials.client(), extractor, config.model())
            .with_summary_chars(config.summary_chars))
    }
}

impl<C: ChatBackend, E: TextExtractor> FunnelGenerator<C, E> {
    pub fn new(chat: C, extractor: E, model: impl Into<String>) -> Self {
        let chat = Arc::new(chat);
        let model = model.into();
        Self {
            summarizer: Summarizer::new(chat.clone(), model.clone()),
            chat,
            extractor,
            model,
            channels: Channel::ALL.to_vec(),
        }
    }

    /// Target summary length in characters.
    pub fn with_summary_chars(mut self, chars: usize) -> Self {
        self.summarizer = self.summarizer.with_target_chars(chars);
        self
    }

    /// Generate only these channels, in this order.
    pub fn with_channels(mut self, channels: impl IntoIterator<Item = Channel>) -> Self {
        self.channels = channels.into_iter().collect();
        self
    }

    /// The chat backend shared by the summarizer and the dispatcher.
    pub fn chat(&self) -> &Arc<C> {
        &self.chat
    }

    pub fn summarizer(&self) -> &Summarizer<Arc<C>> {
        &self.summarizer
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Run with a fresh status log.
    pub async fn run(&self, input: &CampaignInput) -> Result<RunResult, FunnelError> {
        self.run_with_log(input, StatusLog::new()).await
    }

    /// Run, reporting progress through `log` as it happens.
    ///
    /// Only invalid input stops a run. Every later failure is recorded on the
    /// log and the run still yields both artifacts where possible.
    pub async fn run_with_log(
        &self,
        input: &CampaignInput,
        mut log: StatusLog,
    ) -> Result<RunResult, FunnelError> {
        input.validate()?;
        let started = Instant::now();
        log.info(
            None,
            format!(
                "Starting ad generation for {} ({}, {} per stage)",
                input.company_name,
                input.objective.label(),
                input.content_count
            ),
        );

        let provenance = self.gather_context(input, &mut log).await;
        let context = PromptContext {
            url_summary: provenance.url.summary.clone(),
            additional_summary: provenance.additional_context.summary.clone(),
            lead_magnet_summary: provenance.lead_magnet.summary.clone(),
        };
        let inputs = PromptInputs {
            context: &context,
            links: &input.links,
            objective: input.objective,
            content_count: input.content_count,
        };

        let mut run = GenerationRun::new(input.company_name.trim(), provenance);
        let dispatcher = Dispatcher::new(self.chat.as_ref(), &self.model);
        for channel in &self.channels {
            let requests = build_requests(*channel, &inputs);
            let outcome = dispatcher.dispatch_channel(*channel, &requests, &mut log).await;
            let placeholders = outcome.records.iter().filter(|r| r.is_placeholder()).count();
            log.info(
                Some(*channel),
                format!(
                    "{} ads generated ({} placeholder)",
                    outcome.records.len(),
                    placeholders
                ),
            );
            run.channels.insert(*channel, outcome.records);
        }

        let (report, workbook) = report::assemble(&run, &mut log);
        info!(
            company = %run.company_name,
            records = run.record_count(),
            placeholders = run.placeholder_count(),
            duration_ms = started.elapsed().as_millis() as u64,
            "generation run complete"
        );
        log.info(None, "Ad generation complete");

        Ok(RunResult {
            run,
            events: log.into_events(),
            report,
            workbook,
        })
    }

    async fn gather_context(&self, input: &CampaignInput, log: &mut StatusLog) -> Provenance {
        let url_raw = acquire_optional(
            &self.extractor,
            input.client_url.clone().map(Source::Url),
            log,
        )
        .await;
        let additional_raw = acquire_optional(
            &self.extractor,
            input.additional_context.clone().map(Source::Document),
            log,
        )
        .await;
        let lead_magnet_raw = acquire_optional(
            &self.extractor,
            input.lead_magnet.clone().map(Source::Document),
            log,
        )
        .await;

        Provenance {
            url: self.summarize_source("client URL", url_raw, log).await,
            additional_context: self
                .summarize_source("additional context", additional_raw, log)
                .await,
            lead_magnet: self.summarize_source("lead magnet", lead_magnet_raw, log).await,
        }
    }

    async fn summarize_source(&self, label: &str, raw: String, log: &mut StatusLog) -> SourceText {
        if raw.is_empty() {
            return SourceText::default();
        }
        log.info(None, format!("Summarizing {} text", label));
        let summary = self.summarizer.summarize(&raw).await;
        if is_degraded(&summary) {
            log.warning(None, format!("Summary of {} unavailable: {}", label, summary));
        }
        SourceText::new(raw, summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::InputError;
    use crate::testing::{MockChat, MockExtractor};

    #[tokio::test]
    async fn test_invalid_input_stops_before_any_call() {
        let generator = FunnelGenerator::new(MockChat::contract_following(), MockExtractor::new(), "m");
        let input = CampaignInput::new("Acme", "  ");

        let err = generator.run(&input).await.unwrap_err();
        assert!(matches!(err, FunnelError::Input(InputError::MissingBookingLink)));
        assert_eq!(generator.chat.call_count(), 0);
    }

    #[tokio::test]
    async fn test_channel_subset() {
        let generator = FunnelGenerator::new(MockChat::contract_following(), MockExtractor::new(), "m")
            .with_channels([Channel::GoogleDisplay]);

        let result = generator.run(&CampaignInput::new("Acme", "https://book")).await.unwrap();
        assert_eq!(result.run.channels.len(), 1);
        assert_eq!(result.run.channel(Channel::GoogleDisplay).len(), 5);
        assert_eq!(generator.chat.call_count(), 1);
        assert!(result.is_complete());
    }
}
