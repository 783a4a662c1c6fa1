//! Ad records: one generated variation as named string fields.

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::{Map, Value};

use super::channel::{fields, ChannelSchema, FunnelStage};
use crate::error::FailureKind;

/// One ad variation.
///
/// The field set and order always match the channel schema it was built
/// from; missing values are empty strings, never absent keys.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdRecord {
    #[serde(flatten)]
    fields: IndexMap<String, String>,

    #[serde(skip)]
    failure: Option<FailureKind>,
}

/// Where a placeholder sits within a channel's requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaceholderSlot {
    /// 1-based request number within the channel
    pub call: usize,
    /// Stage of that request, if the channel is staged
    pub stage: Option<FunnelStage>,
    /// 1-based position within the batch
    pub variant: usize,
    /// Size of the batch the placeholder belongs to
    pub batch: usize,
}

impl AdRecord {
    /// A record with every schema field empty.
    pub fn empty(schema: &ChannelSchema) -> Self {
        Self {
            fields: schema
                .fields
                .iter()
                .map(|f| (f.to_string(), String::new()))
                .collect(),
            failure: None,
        }
    }

    /// Coerce one response item into the schema's field set.
    ///
    /// Returns `None` when the item is not a JSON object. Keys are matched
    /// exactly first, then ignoring case, spaces and underscores; keys outside
    /// the schema are dropped.
    pub fn from_item(schema: &ChannelSchema, item: &Value) -> Option<Self> {
        let object = item.as_object()?;
        let mut record = Self::empty(schema);
        for field in schema.fields {
            if let Some(value) = lookup(object, field) {
                record.set(field, coerce(value));
            }
        }
        Some(record)
    }

    /// Sentinel record standing in for content that could not be generated.
    pub fn placeholder(schema: &ChannelSchema, kind: FailureKind, slot: PlaceholderSlot) -> Self {
        let mut record = Self::empty(schema);
        let template = schema.placeholder;

        let tag = if template.named {
            let mut name = format!(
                "{}_{}_Call_{}",
                kind.tag(),
                schema.channel.slug(),
                slot.call
            );
            if slot.batch > 1 {
                name.push_str(&format!("_Ver_{}", slot.variant));
            }
            name
        } else {
            kind.tag().to_string()
        };

        record.set(template.tag_field, tag);
        record.set(template.message_field, kind.message());
        if schema.has_field(fields::FUNNEL_STAGE) {
            let stage = slot.stage.map(|s| s.label()).unwrap_or("Error");
            record.set(fields::FUNNEL_STAGE, stage);
        }
        record.failure = Some(kind);
        record
    }

    /// Value of a field, if the schema has it.
    pub fn get(&self, field: &str) -> Option<&str> {
        self.fields.get(field).map(String::as_str)
    }

    /// Overwrite a field that belongs to the schema. Unknown fields are ignored.
    pub fn set(&mut self, field: &str, value: impl Into<String>) {
        if let Some(slot) = self.fields.get_mut(field) {
            *slot = value.into();
        }
    }

    /// Fields in schema order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Field names in schema order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Why this record is a placeholder, if it is one.
    pub fn failure(&self) -> Option<FailureKind> {
        self.failure
    }

    pub fn is_placeholder(&self) -> bool {
        self.failure.is_some()
    }
}

fn lookup<'a>(object: &'a Map<String, Value>, field: &str) -> Option<&'a Value> {
    if let Some(value) = object.get(field) {
        return Some(value);
    }
    let wanted = normalize_key(field);
    object
        .iter()
        .find(|(key, _)| normalize_key(key) == wanted)
        .map(|(_, value)| value)
}

fn normalize_key(key: &str) -> String {
    key.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

fn coerce(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.trim().to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::Array(items) => items
            .iter()
            .map(coerce)
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("\n"),
        Value::Object(_) => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::channel::Channel;
    use serde_json::json;

    #[test]
    fn test_from_item_fills_and_drops() {
        let schema = Channel::GoogleDisplay.schema();
        let record = AdRecord::from_item(
            schema,
            &json!({"Headline": "Fast Water", "Extra": "dropped"}),
        )
        .unwrap();

        let names: Vec<_> = record.field_names().collect();
        assert_eq!(names, vec!["Headline", "Description"]);
        assert_eq!(record.get("Headline"), Some("Fast Water"));
        assert_eq!(record.get("Description"), Some(""));
        assert_eq!(record.get("Extra"), None);
        assert!(!record.is_placeholder());
    }

    #[test]
    fn test_from_item_matches_loose_keys() {
        let schema = Channel::Email.schema();
        let record = AdRecord::from_item(
            schema,
            &json!({"ad_name": "Email_1", "subject line": "Hi", "CTA": 5}),
        )
        .unwrap();

        assert_eq!(record.get("Ad Name"), Some("Email_1"));
        assert_eq!(record.get("Subject Line"), Some("Hi"));
        assert_eq!(record.get("CTA"), Some("5"));
    }

    #[test]
    fn test_from_item_rejects_non_objects() {
        let schema = Channel::Email.schema();
        assert!(AdRecord::from_item(schema, &json!("just text")).is_none());
    }

    #[test]
    fn test_named_placeholder() {
        let schema = Channel::LinkedIn.schema();
        let record = AdRecord::placeholder(
            schema,
            FailureKind::JsonParse,
            PlaceholderSlot {
                call: 2,
                stage: Some(FunnelStage::DemandGen),
                variant: 3,
                batch: 3,
            },
        );

        assert_eq!(record.get("Ad Name"), Some("JSONError_LinkedIn_Call_2_Ver_3"));
        assert_eq!(record.get("Funnel Stage"), Some("Demand Gen"));
        assert_eq!(record.get("Introductory Text"), Some("JSON Parse Error"));
        assert_eq!(record.get("CTA Button"), Some(""));
        assert_eq!(record.failure(), Some(FailureKind::JsonParse));
    }

    #[test]
    fn test_google_placeholder() {
        let schema = Channel::GoogleDisplay.schema();
        let record = AdRecord::placeholder(
            schema,
            FailureKind::Structure,
            PlaceholderSlot {
                call: 1,
                stage: None,
                variant: 1,
                batch: 5,
            },
        );

        assert_eq!(record.get("Headline"), Some("StructError"));
        assert_eq!(record.get("Description"), Some("JSON Structure Error"));
    }

    #[test]
    fn test_serializes_in_field_order() {
        let schema = Channel::GoogleSearch.schema();
        let mut record = AdRecord::empty(schema);
        record.set("Headline", "H");
        let json = serde_json::to_string(&record).unwrap();
        assert_eq!(json, r#"{"Headline":"H","Description":""}"#);
    }
}
