//! One outbound generation call and what it is expected to return.

use openai_client::{ChatRequest, Message};

use super::channel::{Channel, ChannelSchema, FunnelStage};

/// A single generation-API call definition.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestSpec {
    pub channel: Channel,

    /// Stage this request generates for, if the channel is staged
    pub stage: Option<FunnelStage>,

    /// Role-tagged messages, system first
    pub messages: Vec<Message>,

    /// Items the response list must contain
    pub expected_count: usize,

    /// Key under which the response lists its items
    pub root_key: &'static str,
}

impl RequestSpec {
    pub fn new(
        channel: Channel,
        stage: Option<FunnelStage>,
        system: impl Into<String>,
        user: impl Into<String>,
        expected_count: usize,
    ) -> Self {
        Self {
            channel,
            stage,
            messages: vec![Message::system(system), Message::user(user)],
            expected_count,
            root_key: channel.schema().root_key,
        }
    }

    pub fn schema(&self) -> &'static ChannelSchema {
        self.channel.schema()
    }

    /// Chat request demanding a JSON-object response.
    pub fn to_chat_request(&self, model: &str) -> ChatRequest {
        ChatRequest::new(model)
            .messages(self.messages.iter().cloned())
            .json_object()
    }

    /// Content of the user message.
    pub fn user_prompt(&self) -> &str {
        self.messages
            .iter()
            .find(|m| m.role == "user")
            .map(|m| m.content.as_str())
            .unwrap_or_default()
    }

    /// Content of the system message.
    pub fn system_prompt(&self) -> &str {
        self.messages
            .iter()
            .find(|m| m.role == "system")
            .map(|m| m.content.as_str())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use openai_client::ResponseFormat;

    #[test]
    fn test_chat_request_is_json_mode() {
        let spec = RequestSpec::new(Channel::GoogleDisplay, None, "sys", "usr", 5);
        let request = spec.to_chat_request("gpt-4.1-mini");

        assert_eq!(request.model, "gpt-4.1-mini");
        assert_eq!(request.messages.len(), 2);
        assert_eq!(request.messages[0].role, "system");
        assert_eq!(request.response_format, Some(ResponseFormat::JsonObject));
        assert_eq!(spec.root_key, "ads");
        assert_eq!(spec.user_prompt(), "usr");
    }
}
