//! Run-level values: status events, provenance and results.

use indexmap::IndexMap;
use serde::Serialize;
use std::fmt;
use tracing::{error, info, warn};

use super::channel::Channel;
use super::record::AdRecord;

/// Severity of a status event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

/// A human-readable message surfaced where it happened.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusEvent {
    pub level: StatusLevel,
    pub channel: Option<Channel>,
    pub message: String,
}

impl fmt::Display for StatusEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.level {
            StatusLevel::Info => "info",
            StatusLevel::Warning => "warning",
            StatusLevel::Error => "error",
        };
        match self.channel {
            Some(channel) => write!(f, "[{}] {}: {}", level, channel, self.message),
            None => write!(f, "[{}] {}", level, self.message),
        }
    }
}

type Observer = Box<dyn Fn(&StatusEvent) + Send + Sync>;

/// Ordered log of status events for one run.
///
/// Every push is mirrored to `tracing` and to the optional observer at the
/// moment it happens.
#[derive(Default)]
pub struct StatusLog {
    events: Vec<StatusEvent>,
    observer: Option<Observer>,
}

impl fmt::Debug for StatusLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatusLog")
            .field("events", &self.events)
            .field("observer", &self.observer.is_some())
            .finish()
    }
}

impl StatusLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Call `observer` for every event as it is recorded.
    pub fn with_observer(mut self, observer: impl Fn(&StatusEvent) + Send + Sync + 'static) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    pub fn push(&mut self, level: StatusLevel, channel: Option<Channel>, message: impl Into<String>) {
        let event = StatusEvent {
            level,
            channel,
            message: message.into(),
        };
        let channel_label = channel.map(|c| c.label()).unwrap_or("-");
        match level {
            StatusLevel::Info => info!(channel = channel_label, "{}", event.message),
            StatusLevel::Warning => warn!(channel = channel_label, "{}", event.message),
            StatusLevel::Error => error!(channel = channel_label, "{}", event.message),
        }
        if let Some(observer) = &self.observer {
            observer(&event);
        }
        self.events.push(event);
    }

    pub fn info(&mut self, channel: Option<Channel>, message: impl Into<String>) {
        self.push(StatusLevel::Info, channel, message);
    }

    pub fn warning(&mut self, channel: Option<Channel>, message: impl Into<String>) {
        self.push(StatusLevel::Warning, channel, message);
    }

    pub fn error(&mut self, channel: Option<Channel>, message: impl Into<String>) {
        self.push(StatusLevel::Error, channel, message);
    }

    pub fn events(&self) -> &[StatusEvent] {
        &self.events
    }

    /// Events at `Error` level.
    pub fn errors(&self) -> impl Iterator<Item = &StatusEvent> {
        self.events.iter().filter(|e| e.level == StatusLevel::Error)
    }

    pub fn into_events(self) -> Vec<StatusEvent> {
        self.events
    }
}

/// Raw text pulled from one source and its summary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SourceText {
    pub raw: String,
    pub summary: String,
}

impl SourceText {
    pub fn new(raw: impl Into<String>, summary: impl Into<String>) -> Self {
        Self {
            raw: raw.into(),
            summary: summary.into(),
        }
    }
}

/// Raw and summarized text for every context source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Provenance {
    pub url: SourceText,
    pub additional_context: SourceText,
    pub lead_magnet: SourceText,
}

/// Everything generated in one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GenerationRun {
    pub company_name: String,
    pub provenance: Provenance,
    /// Channel results in generation order
    pub channels: IndexMap<Channel, Vec<AdRecord>>,
}

impl GenerationRun {
    pub fn new(company_name: impl Into<String>, provenance: Provenance) -> Self {
        Self {
            company_name: company_name.into(),
            provenance,
            channels: IndexMap::new(),
        }
    }

    pub fn channel(&self, channel: Channel) -> &[AdRecord] {
        self.channels
            .get(&channel)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Total records across channels.
    pub fn record_count(&self) -> usize {
        self.channels.values().map(Vec::len).sum()
    }

    /// Total placeholder records across channels.
    pub fn placeholder_count(&self) -> usize {
        self.channels
            .values()
            .flatten()
            .filter(|r| r.is_placeholder())
            .count()
    }
}

/// A produced file.
#[derive(Clone, PartialEq, Eq)]
pub struct Artifact {
    pub file_name: String,
    pub mime_type: &'static str,
    pub bytes: Vec<u8>,
}

impl fmt::Debug for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Artifact")
            .field("file_name", &self.file_name)
            .field("mime_type", &self.mime_type)
            .field("bytes", &self.bytes.len())
            .finish()
    }
}

/// Outcome of one user-triggered run.
#[derive(Debug, Clone)]
pub struct RunResult {
    pub run: GenerationRun,
    pub events: Vec<StatusEvent>,
    /// Narrative transparency report (DOCX)
    pub report: Option<Artifact>,
    /// Ad content workbook (XLSX)
    pub workbook: Option<Artifact>,
}

impl RunResult {
    /// Both artifacts were produced.
    pub fn is_complete(&self) -> bool {
        self.report.is_some() && self.workbook.is_some()
    }

    pub fn artifacts(&self) -> impl Iterator<Item = &Artifact> {
        self.report.iter().chain(self.workbook.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_status_log_records_and_observes() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        let mut log = StatusLog::new().with_observer(move |e| sink.lock().unwrap().push(e.to_string()));

        log.info(None, "started");
        log.error(Some(Channel::LinkedIn), "key rejected");

        assert_eq!(log.events().len(), 2);
        assert_eq!(log.errors().count(), 1);
        assert_eq!(
            seen.lock().unwrap().as_slice(),
            &[
                "[info] started".to_string(),
                "[error] LinkedIn: key rejected".to_string()
            ]
        );
    }

    #[test]
    fn test_missing_channel_is_empty_slice() {
        let run = GenerationRun::new("Acme", Provenance::default());
        assert!(run.channel(Channel::Email).is_empty());
        assert_eq!(run.record_count(), 0);
    }
}
