use super::{or_not_provided, output_contract, PromptInputs};
use crate::types::channel::{Channel, FunnelStage};
use crate::types::request::RequestSpec;

const SYSTEM_PROMPT: &str = "You are an expert marketing copywriter. Generate ad copy in JSON format. \
Ensure the JSON is valid and contains all requested fields.";

/// One batched request for `content_count` email variations.
///
/// Emails always target the Demand Capture stage.
pub fn email_requests(inputs: &PromptInputs<'_>) -> Vec<RequestSpec> {
    let count = inputs.content_count.get();
    let stage = FunnelStage::DemandCapture;
    let root_key = Channel::Email.schema().root_key;
    let objective = inputs.objective.label();
    let booking = &inputs.links.booking;

    let user = format!(
        r#"Task: Generate {count} unique email ad variations.

Company Context:
- URL Summary: {url}
- Additional Info Summary: {additional}

Campaign Details for all variations:
- Funnel Stage: {stage}
- Lead Objective: {objective}
- Booking Link (for CTA): {booking}

{contract}
Assign a unique "Ad Name" to each variation ("Email_{stage_slug}_Ver_1", "Email_{stage_slug}_Ver_2", ...).

Example:
{{
  "{root_key}": [
    {{
      "Ad Name": "Email_{stage_slug}_Ver_1",
      "Funnel Stage": "{stage}",
      "Headline": "Generated headline",
      "Subject Line": "Generated subject line",
      "Body": "Generated email body that leads to the CTA.",
      "CTA": "Action-oriented text for '{objective}' linking to {booking}"
    }}
  ]
}}"#,
        url = or_not_provided(&inputs.context.url_summary),
        additional = or_not_provided(&inputs.context.additional_summary),
        stage = stage.label(),
        stage_slug = stage.slug(),
        contract = output_contract(root_key, count),
    );

    vec![RequestSpec::new(
        Channel::Email,
        Some(stage),
        SYSTEM_PROMPT,
        user,
        count,
    )]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompts::PromptContext;
    use crate::types::channel::FunnelObjective;
    use crate::types::input::{CampaignLinks, ContentCount};

    #[test]
    fn test_single_batched_request() {
        let context = PromptContext::default();
        let links = CampaignLinks {
            booking: "https://acme.test/book".into(),
            ..Default::default()
        };
        let inputs = PromptInputs {
            context: &context,
            links: &links,
            objective: FunnelObjective::SalesMeeting,
            content_count: ContentCount::new(5).unwrap(),
        };

        let requests = email_requests(&inputs);
        assert_eq!(requests.len(), 1);

        let request = &requests[0];
        assert_eq!(request.stage, Some(FunnelStage::DemandCapture));
        assert_eq!(request.expected_count, 5);
        assert_eq!(request.root_key, "email_ads");

        let prompt = request.user_prompt();
        assert!(prompt.contains("Generate 5 unique email ad variations"));
        assert!(prompt.contains("https://acme.test/book"));
        assert!(prompt.contains("Sales Meeting"));
        assert!(prompt.contains("URL Summary: Not provided."));
        assert!(prompt.contains(r#""email_ads": ["#));
    }
}
