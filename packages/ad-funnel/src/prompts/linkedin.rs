use super::social::{stage_briefs, staged_requests, StageBrief};
use super::{or_na, PromptInputs};
use crate::types::channel::{Channel, FunnelObjective};
use crate::types::request::RequestSpec;

const SYSTEM_PROMPT: &str = "You are an expert marketing copywriter specializing in LinkedIn ads. \
Generate ad copy in JSON format. Ensure the JSON is valid and contains all requested fields. \
The output must be a single JSON object with a key 'ads' containing the list of ad variations \
for the specified funnel stage.";

/// Demand Capture CTA: demo objectives register, everything else requests.
pub fn linkedin_demand_capture_cta(objective: FunnelObjective) -> &'static str {
    if objective.label().contains("Demo") {
        "Register"
    } else {
        "Request"
    }
}

/// One request per funnel stage, each for `content_count` variations.
pub fn linkedin_requests(inputs: &PromptInputs<'_>) -> Vec<RequestSpec> {
    let briefs = stage_briefs(
        inputs.context,
        inputs.links,
        inputs.objective.label(),
        linkedin_demand_capture_cta(inputs.objective),
    );
    staged_requests(Channel::LinkedIn, SYSTEM_PROMPT, inputs, &briefs, example_ad)
}

fn example_ad(brief: &StageBrief, ad_name: &str) -> String {
    format!(
        r#"    {{
      "Ad Name": "{ad_name}",
      "Funnel Stage": "{stage}",
      "Introductory Text": "Generated introductory text.",
      "Image Copy": "Suggested text overlay or concept for the image/video.",
      "Headline": "Generated headline.",
      "Destination": "{destination}",
      "CTA Button": "{cta}"
    }}"#,
        stage = brief.stage.label(),
        destination = or_na(&brief.destination),
        cta = brief.cta_button,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompts::PromptContext;
    use crate::types::channel::FunnelStage;
    use crate::types::input::{CampaignLinks, ContentCount};

    fn requests(objective: FunnelObjective) -> Vec<RequestSpec> {
        let context = PromptContext::default();
        let links = CampaignLinks {
            learn_more: "https://learn".into(),
            lead_magnet: "https://magnet".into(),
            booking: "https://book".into(),
        };
        linkedin_requests(&PromptInputs {
            context: &context,
            links: &links,
            objective,
            content_count: ContentCount::new(3).unwrap(),
        })
    }

    #[test]
    fn test_cta_follows_objective() {
        assert_eq!(linkedin_demand_capture_cta(FunnelObjective::DemoBooking), "Register");
        assert_eq!(linkedin_demand_capture_cta(FunnelObjective::SalesMeeting), "Request");
    }

    #[test]
    fn test_one_request_per_stage() {
        let requests = requests(FunnelObjective::DemoBooking);
        let stages: Vec<_> = requests.iter().map(|r| r.stage).collect();
        assert_eq!(
            stages,
            vec![
                Some(FunnelStage::BrandAwareness),
                Some(FunnelStage::DemandGen),
                Some(FunnelStage::DemandCapture)
            ]
        );
        assert!(requests.iter().all(|r| r.expected_count == 3));
        assert!(requests[0].user_prompt().contains("'Brand Awareness' funnel stage"));
        assert!(requests[2].user_prompt().contains("CTA Button Text: Register"));
        assert!(requests[2]
            .user_prompt()
            .contains(r#""Ad Name": "LinkedIn_DemandCapture_Ver_1""#));
    }

    #[test]
    fn test_sales_meeting_requests() {
        let requests = requests(FunnelObjective::SalesMeeting);
        assert!(requests[2].user_prompt().contains("CTA Button Text: Request"));
        assert!(requests[2].user_prompt().contains("Lead Objective: Sales Meeting"));
    }
}
