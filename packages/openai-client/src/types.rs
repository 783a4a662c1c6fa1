//! Wire types for the chat completions endpoint.

use serde::{Deserialize, Serialize};

/// Body of `POST /chat/completions`.
///
/// Optional knobs are left out of the serialized body when unset so the
/// server applies its own defaults.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<Message>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,

    /// Completion cap understood by gpt-4 class models
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,

    /// Completion cap understood by reasoning models (o1, o3, gpt-5)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_completion_tokens: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_format: Option<ResponseFormat>,
}

impl ChatRequest {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            messages: Vec::new(),
            temperature: None,
            max_tokens: None,
            max_completion_tokens: None,
            response_format: None,
        }
    }

    /// Append one message.
    pub fn message(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }

    /// Append several messages in order.
    pub fn messages(mut self, messages: impl IntoIterator<Item = Message>) -> Self {
        self.messages.extend(messages);
        self
    }

    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Cap the completion length, using whichever field the model accepts.
    pub fn token_cap(mut self, tokens: u32) -> Self {
        if is_reasoning_model(&self.model) {
            self.max_completion_tokens = Some(tokens);
        } else {
            self.max_tokens = Some(tokens);
        }
        self
    }

    /// Require the completion to be a single JSON object.
    pub fn json_object(mut self) -> Self {
        self.response_format = Some(ResponseFormat::JsonObject);
        self
    }

    pub fn wants_json(&self) -> bool {
        self.response_format == Some(ResponseFormat::JsonObject)
    }
}

/// Reasoning models reject `max_tokens` and need `max_completion_tokens`.
pub fn is_reasoning_model(model: &str) -> bool {
    ["o1", "o3", "o4", "gpt-5"]
        .iter()
        .any(|prefix| model.starts_with(prefix) || model.contains(&format!("-{}", prefix)))
}

/// `response_format` object of a chat request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResponseFormat {
    Text,
    JsonObject,
}

/// One conversation turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// "system" or "user"
    pub role: String,
    pub content: String,
}

impl Message {
    pub fn system(content: impl Into<String>) -> Self {
        Self::with_role("system", content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::with_role("user", content)
    }

    fn with_role(role: &str, content: impl Into<String>) -> Self {
        Self {
            role: role.to_string(),
            content: content.into(),
        }
    }
}

/// The first choice of a completion.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatResponse {
    /// Completion text; empty when the model returned null content
    pub content: String,

    /// Why generation stopped ("stop", "length", "content_filter")
    pub finish_reason: Option<String>,

    pub usage: Option<Usage>,
}

impl ChatResponse {
    /// A finished completion with no usage data.
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            finish_reason: Some("stop".to_string()),
            usage: None,
        }
    }

    /// Generation hit the token cap, so the content is cut short.
    pub fn is_truncated(&self) -> bool {
        self.finish_reason.as_deref() == Some("length")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CompletionEnvelope {
    pub choices: Vec<Choice>,
    pub usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Choice {
    pub message: ChoiceMessage,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChoiceMessage {
    /// Null for refusals and tool-only replies
    #[serde(default)]
    pub content: Option<String>,
}

impl CompletionEnvelope {
    pub(crate) fn into_response(self) -> Option<ChatResponse> {
        let choice = self.choices.into_iter().next()?;
        Some(ChatResponse {
            content: choice.message.content.unwrap_or_default(),
            finish_reason: choice.finish_reason,
            usage: self.usage,
        })
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

/// Human-readable message from an error response body.
///
/// Uses `error.message` when the body is the usual error envelope, the raw
/// body otherwise.
pub fn api_error_message(body: &str) -> String {
    serde_json::from_str::<ErrorEnvelope>(body)
        .map(|envelope| envelope.error.message)
        .unwrap_or_else(|_| body.trim().to_string())
}

/// Longest prefix of `s` within `max_bytes` that ends on a char boundary.
pub fn truncate_to_char_boundary(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Remove a surrounding markdown code fence (```` ```json ```` or bare).
pub fn strip_code_blocks(response: &str) -> &str {
    let trimmed = response.trim();
    let Some(fenced) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = fenced.strip_prefix("json").unwrap_or(fenced);
    body.strip_suffix("```").unwrap_or(body).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_body_omits_unset_fields() {
        let req = ChatRequest::new("gpt-4.1-mini")
            .message(Message::system("Reply in JSON"))
            .message(Message::user("Three colors"))
            .json_object();

        let body = serde_json::to_value(&req).unwrap();
        assert_eq!(body["model"], "gpt-4.1-mini");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][1]["content"], "Three colors");
        assert_eq!(body["response_format"]["type"], "json_object");
        assert!(body.get("temperature").is_none());
        assert!(body.get("max_tokens").is_none());
        assert!(req.wants_json());
    }

    #[test]
    fn test_messages_appends() {
        let req = ChatRequest::new("m")
            .message(Message::system("a"))
            .messages([Message::user("b"), Message::user("c")]);
        assert_eq!(req.messages.len(), 3);
        assert_eq!(req.messages[0].role, "system");
    }

    #[test]
    fn test_token_cap_picks_field() {
        let legacy = ChatRequest::new("gpt-4.1-mini").temperature(0.3).token_cap(714);
        assert_eq!(legacy.max_tokens, Some(714));
        assert_eq!(legacy.max_completion_tokens, None);
        assert_eq!(legacy.temperature, Some(0.3));

        let reasoning = ChatRequest::new("o3-mini").token_cap(714);
        assert_eq!(reasoning.max_tokens, None);
        assert_eq!(reasoning.max_completion_tokens, Some(714));
    }

    #[test]
    fn test_is_reasoning_model() {
        assert!(is_reasoning_model("o1-preview"));
        assert!(is_reasoning_model("gpt-5-mini"));
        assert!(is_reasoning_model("azure-o3"));
        assert!(!is_reasoning_model("gpt-4o"));
        assert!(!is_reasoning_model("gpt-4.1-mini"));
    }

    #[test]
    fn test_envelope_into_response() {
        let envelope: CompletionEnvelope = serde_json::from_str(
            r#"{"choices":[{"message":{"role":"assistant","content":null},"finish_reason":"length"}],
                "usage":{"prompt_tokens":10,"completion_tokens":5,"total_tokens":15}}"#,
        )
        .unwrap();

        let response = envelope.into_response().unwrap();
        assert_eq!(response.content, "");
        assert!(response.is_truncated());
        assert_eq!(response.usage.unwrap().total_tokens, 15);

        let empty: CompletionEnvelope = serde_json::from_str(r#"{"choices":[]}"#).unwrap();
        assert!(empty.into_response().is_none());
    }

    #[test]
    fn test_api_error_message() {
        let body = r#"{"error":{"message":"Incorrect API key provided","type":"invalid_request_error"}}"#;
        assert_eq!(api_error_message(body), "Incorrect API key provided");
        assert_eq!(api_error_message(" upstream timeout \n"), "upstream timeout");
    }

    #[test]
    fn test_truncate_to_char_boundary() {
        let text = "Hello 世界";
        assert_eq!(truncate_to_char_boundary(text, 8), "Hello ");
        assert_eq!(truncate_to_char_boundary(text, 100), text);
    }

    #[test]
    fn test_strip_code_blocks() {
        assert_eq!(strip_code_blocks("```json\n{}\n```"), "{}");
        assert_eq!(strip_code_blocks("```\n{}\n```"), "{}");
        assert_eq!(strip_code_blocks("  {\"a\": 1} "), "{\"a\": 1}");
    }
}
