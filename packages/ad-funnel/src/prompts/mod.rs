//! Prompt builders for every channel.
//!
//! Each builder is a pure function of the summarized context, the campaign
//! links and the funnel objective. All instructions share one output contract
//! ([`output_contract`]): the whole response is a single JSON object whose
//! documented root key holds the list of ads. The dispatcher's parser relies on
//! exactly that contract.

mod email;
mod facebook;
mod google_display;
mod google_search;
mod linkedin;
mod social;

pub use email::email_requests;
pub use facebook::facebook_requests;
pub use google_display::google_display_requests;
pub use google_search::google_search_requests;
pub use linkedin::{linkedin_demand_capture_cta, linkedin_requests};
pub use social::StageBrief;

use crate::types::channel::{Channel, FunnelObjective};
use crate::types::input::{CampaignLinks, ContentCount};
use crate::types::request::RequestSpec;

/// Summarized context fed into every prompt. Any part may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptContext {
    pub url_summary: String,
    pub additional_summary: String,
    pub lead_magnet_summary: String,
}

/// Inputs shared by all channel builders.
#[derive(Debug, Clone, Copy)]
pub struct PromptInputs<'a> {
    pub context: &'a PromptContext,
    pub links: &'a CampaignLinks,
    pub objective: FunnelObjective,
    pub content_count: ContentCount,
}

/// Build the ordered request sequence for one channel.
pub fn build_requests(channel: Channel, inputs: &PromptInputs<'_>) -> Vec<RequestSpec> {
    match channel {
        Channel::Email => email_requests(inputs),
        Channel::LinkedIn => linkedin_requests(inputs),
        Channel::Facebook => facebook_requests(inputs),
        Channel::GoogleSearch => google_search_requests(inputs.context),
        Channel::GoogleDisplay => google_display_requests(inputs.context),
    }
}

/// The JSON-only response contract stated in every user prompt.
pub fn output_contract(root_key: &str, count: usize) -> String {
    format!(
        "Output Format:\n\
         Respond with ONE well-formed JSON object and nothing else. Do NOT add any text, \
         explanation or markdown code fences before or after the JSON object.\n\
         The root key MUST be \"{root_key}\" and its value MUST be a list of exactly {count} JSON objects.\n\
         Every object MUST contain every field shown in the example below, using the exact key names."
    )
}

pub(crate) fn or_not_provided(text: &str) -> &str {
    if text.trim().is_empty() {
        "Not provided."
    } else {
        text
    }
}

pub(crate) fn or_na(text: &str) -> &str {
    if text.trim().is_empty() {
        "N/A"
    } else {
        text
    }
}

/// URL + additional context block, used as supporting context.
pub(crate) fn company_context(context: &PromptContext) -> String {
    format!(
        "URL Summary: {}\nAdditional Context: {}",
        or_na(&context.url_summary),
        or_na(&context.additional_summary)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contract_names_root_key_and_count() {
        let contract = output_contract("ads", 15);
        assert!(contract.contains("\"ads\""));
        assert!(contract.contains("exactly 15"));
        assert!(contract.contains("ONE well-formed JSON object"));
    }

    #[test]
    fn test_empty_context_placeholders() {
        assert_eq!(or_not_provided(""), "Not provided.");
        assert_eq!(or_na("  "), "N/A");
        assert_eq!(or_na("text"), "text");
    }

    #[test]
    fn test_build_requests_cardinality() {
        let context = PromptContext::default();
        let links = CampaignLinks::default();
        let inputs = PromptInputs {
            context: &context,
            links: &links,
            objective: FunnelObjective::DemoBooking,
            content_count: ContentCount::new(4).unwrap(),
        };

        for channel in Channel::ALL {
            let requests = build_requests(channel, &inputs);
            assert_eq!(requests.len(), channel.request_count(), "{channel}");
            let total: usize = requests.iter().map(|r| r.expected_count).sum();
            assert_eq!(total, channel.schema().expected_len(4), "{channel}");
            for request in &requests {
                assert_eq!(request.channel, channel);
                assert_eq!(request.root_key, channel.schema().root_key);
                assert!(request.user_prompt().contains(request.root_key));
            }
        }
    }

    #[test]
    fn test_builders_are_deterministic() {
        let context = PromptContext {
            url_summary: "We sell water".into(),
            additional_summary: String::new(),
            lead_magnet_summary: "Guide".into(),
        };
        let links = CampaignLinks {
            learn_more: "https://a".into(),
            lead_magnet: "https://b".into(),
            booking: "https://c".into(),
        };
        let inputs = PromptInputs {
            context: &context,
            links: &links,
            objective: FunnelObjective::SalesMeeting,
            content_count: ContentCount::default(),
        };

        for channel in Channel::ALL {
            assert_eq!(build_requests(channel, &inputs), build_requests(channel, &inputs));
        }
    }
}
