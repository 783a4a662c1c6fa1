//! Response parsing and normalization into ad records.
//!
//! One response is accepted only if it is a JSON object whose documented root
//! key holds a list. Accepted lists are then forced into the request's
//! cardinality: non-object items become placeholders, surplus items are
//! dropped and missing ones are padded with placeholders.

use openai_client::{strip_code_blocks, truncate_to_char_boundary};
use serde_json::Value;
use thiserror::Error;

use crate::error::FailureKind;
use crate::types::channel::fields;
use crate::types::record::{AdRecord, PlaceholderSlot};
use crate::types::request::RequestSpec;

/// How much of an offending response to quote in status messages.
const EXCERPT_BYTES: usize = 300;

/// Why a response could not be used at all.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResponseError {
    #[error("response is not valid JSON: {detail}")]
    JsonParse { detail: String },

    #[error("expected a \"{root_key}\" list: {detail}")]
    Structure { root_key: String, detail: String },
}

impl ResponseError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::JsonParse { .. } => FailureKind::JsonParse,
            Self::Structure { .. } => FailureKind::Structure,
        }
    }
}

/// Records from one accepted response plus what had to be repaired.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedBatch {
    pub records: Vec<AdRecord>,
    /// Items that were not JSON objects
    pub malformed: usize,
    /// Items beyond the expected count
    pub dropped: usize,
    /// Placeholders added to reach the expected count
    pub padded: usize,
    /// Descriptions cleared to honour the blank-description rule
    pub cleared_descriptions: usize,
}

impl NormalizedBatch {
    pub fn is_clean(&self) -> bool {
        self.malformed == 0 && self.dropped == 0 && self.padded == 0
    }
}

/// Extract the item list from a raw completion.
pub fn parse_items(content: &str, root_key: &str) -> Result<Vec<Value>, ResponseError> {
    let body = strip_code_blocks(content);
    let value: Value = serde_json::from_str(body).map_err(|e| ResponseError::JsonParse {
        detail: format!("{} (response: {})", e, excerpt(body)),
    })?;

    let structure_error = |detail: String| ResponseError::Structure {
        root_key: root_key.to_string(),
        detail,
    };

    let object = value
        .as_object()
        .ok_or_else(|| structure_error(format!("root is not an object (got {})", excerpt(body))))?;

    match object.get(root_key) {
        Some(Value::Array(items)) => Ok(items.clone()),
        Some(other) => Err(structure_error(format!(
            "\"{}\" is {}, not a list",
            root_key,
            json_type(other)
        ))),
        None => Err(structure_error(format!(
            "missing root key (got {})",
            excerpt(body)
        ))),
    }
}

/// Coerce items into records of exactly `spec.expected_count`.
pub fn normalize_items(spec: &RequestSpec, call: usize, items: &[Value]) -> NormalizedBatch {
    let schema = spec.schema();
    let expected = spec.expected_count;
    let slot = |variant: usize| PlaceholderSlot {
        call,
        stage: spec.stage,
        variant,
        batch: expected,
    };

    let mut batch = NormalizedBatch {
        records: Vec::with_capacity(expected),
        malformed: 0,
        dropped: items.len().saturating_sub(expected),
        padded: 0,
        cleared_descriptions: 0,
    };

    for (index, item) in items.iter().take(expected).enumerate() {
        let record = match AdRecord::from_item(schema, item) {
            Some(record) => record,
            None => {
                batch.malformed += 1;
                AdRecord::placeholder(schema, FailureKind::MalformedItem, slot(index + 1))
            }
        };
        batch.records.push(record);
    }

    while batch.records.len() < expected {
        let variant = batch.records.len() + 1;
        batch
            .records
            .push(AdRecord::placeholder(schema, FailureKind::MissingItem, slot(variant)));
        batch.padded += 1;
    }

    batch.cleared_descriptions = blank_late_descriptions(spec, &mut batch.records);
    batch
}

/// Empty the Description of every record past the schema's threshold.
///
/// Placeholders are blanked too; their tag field still marks them. Returns
/// how many generated (non-placeholder) descriptions were discarded.
fn blank_late_descriptions(spec: &RequestSpec, records: &mut [AdRecord]) -> usize {
    let Some(from) = spec.schema().blank_description_from else {
        return 0;
    };
    let mut cleared = 0;
    for record in records.iter_mut().skip(from) {
        if record.get(fields::DESCRIPTION).is_some_and(|d| !d.is_empty()) {
            if !record.is_placeholder() {
                cleared += 1;
            }
            record.set(fields::DESCRIPTION, "");
        }
    }
    cleared
}

/// A full batch of placeholders standing in for one failed request.
pub fn placeholder_batch(spec: &RequestSpec, call: usize, kind: FailureKind) -> Vec<AdRecord> {
    let expected = spec.expected_count;
    let mut records: Vec<AdRecord> = (1..=expected)
        .map(|variant| {
            AdRecord::placeholder(
                spec.schema(),
                kind,
                PlaceholderSlot {
                    call,
                    stage: spec.stage,
                    variant,
                    batch: expected,
                },
            )
        })
        .collect();
    blank_late_descriptions(spec, &mut records);
    records
}

/// Leading slice of a response for status messages.
pub fn excerpt(text: &str) -> String {
    let cut = truncate_to_char_boundary(text, EXCERPT_BYTES);
    if cut.len() < text.len() {
        format!("{}...", cut)
    } else {
        cut.to_string()
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "a list",
        Value::Object(_) => "an object",
    }
}
