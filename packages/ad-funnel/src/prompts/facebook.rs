use super::social::{stage_briefs, staged_requests, StageBrief};
use super::{or_na, PromptInputs};
use crate::types::channel::Channel;
use crate::types::request::RequestSpec;

const SYSTEM_PROMPT: &str = "You are an expert marketing copywriter specializing in Facebook ads. \
Generate ad copy in JSON format. Ensure the JSON is valid and contains all requested fields.";

/// Facebook's Demand Capture button does not depend on the objective.
const DEMAND_CAPTURE_CTA: &str = "Book Now";

/// One request per funnel stage, each for `content_count` variations.
pub fn facebook_requests(inputs: &PromptInputs<'_>) -> Vec<RequestSpec> {
    let briefs = stage_briefs(
        inputs.context,
        inputs.links,
        inputs.objective.label(),
        DEMAND_CAPTURE_CTA,
    );
    staged_requests(Channel::Facebook, SYSTEM_PROMPT, inputs, &briefs, example_ad)
}

fn example_ad(brief: &StageBrief, ad_name: &str) -> String {
    format!(
        r#"    {{
      "Ad Name": "{ad_name}",
      "Funnel Stage": "{stage}",
      "Primary Text": "Generated primary text.",
      "Image Copy": "Suggested text overlay or concept for the image/video.",
      "Headline": "Generated headline shown below the image/video.",
      "Link Description": "Generated news feed link description.",
      "Destination": "{destination}",
      "CTA Button": "{cta}"
    }}"#,
        stage = brief.stage.label(),
        destination = or_na(&brief.destination),
        cta = brief.cta_button,
    )
}
