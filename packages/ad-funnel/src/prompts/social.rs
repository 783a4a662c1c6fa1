//! Funnel-stage briefs shared by the LinkedIn and Facebook builders.

use super::{company_context, or_na, output_contract, PromptContext, PromptInputs};
use crate::types::channel::{Channel, FunnelStage};
use crate::types::input::CampaignLinks;
use crate::types::request::RequestSpec;

/// What one stage's ads should push toward and what they draw on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageBrief {
    pub stage: FunnelStage,
    pub cta_button: String,
    pub destination: String,
    pub primary_context: String,
    pub supporting_context: String,
}

/// Briefs for all three stages, in funnel order.
pub(crate) fn stage_briefs(
    context: &PromptContext,
    links: &CampaignLinks,
    objective_label: &str,
    demand_capture_cta: &str,
) -> Vec<StageBrief> {
    FunnelStage::ALL
        .iter()
        .map(|&stage| match stage {
            FunnelStage::BrandAwareness => StageBrief {
                stage,
                cta_button: "Learn More".to_string(),
                destination: links.learn_more.clone(),
                primary_context: company_context(context),
                supporting_context: String::new(),
            },
            FunnelStage::DemandGen => StageBrief {
                stage,
                cta_button: "Download".to_string(),
                destination: links.lead_magnet.clone(),
                primary_context: format!(
                    "Lead Magnet Summary: {}",
                    or_na(&context.lead_magnet_summary)
                ),
                supporting_context: company_context(context),
            },
            FunnelStage::DemandCapture => StageBrief {
                stage,
                cta_button: demand_capture_cta.to_string(),
                destination: links.booking.clone(),
                primary_context: format!("Lead Objective: {}", objective_label),
                supporting_context: company_context(context),
            },
        })
        .collect()
}

/// One request per stage brief.
///
/// `example` renders the channel's example ad object for a brief and ad name.
pub(crate) fn staged_requests(
    channel: Channel,
    system_prompt: &str,
    inputs: &PromptInputs<'_>,
    briefs: &[StageBrief],
    example: impl Fn(&StageBrief, &str) -> String,
) -> Vec<RequestSpec> {
    let count = inputs.content_count.get();
    let root_key = channel.schema().root_key;

    briefs
        .iter()
        .map(|brief| {
            let stage = brief.stage.label();
            let ad_name = format!("{}_{}_Ver_1", channel.slug(), brief.stage.slug());
            let user = format!(
                r#"Task: Generate {count} unique {channel} ad variations for the '{stage}' funnel stage.

Company Context:
- Primary Context for these ads: {primary}
- Supporting Context: {supporting}

Campaign Details for all variations in this batch:
- Funnel Stage: {stage}
- Destination Link: {destination}
- CTA Button Text: {cta}

{contract}
Each object is one {channel} ad variation for the '{stage}' stage, with a unique "Ad Name" ("{slug}_{stage_slug}_Ver_1", "{slug}_{stage_slug}_Ver_2", ...).

Example:
{{
  "{root_key}": [
{example}
  ]
}}"#,
                channel = channel.label(),
                primary = brief.primary_context,
                supporting = or_na(&brief.supporting_context),
                destination = or_na(&brief.destination),
                cta = brief.cta_button,
                contract = output_contract(root_key, count),
                slug = channel.slug(),
                stage_slug = brief.stage.slug(),
                example = example(brief, &ad_name),
            );

            RequestSpec::new(channel, Some(brief.stage), system_prompt, user, count)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_briefs_route_links_by_stage() {
        let context = PromptContext {
            url_summary: "Water filters".into(),
            additional_summary: String::new(),
            lead_magnet_summary: "Filter buying guide".into(),
        };
        let links = CampaignLinks {
            learn_more: "https://learn".into(),
            lead_magnet: "https://magnet".into(),
            booking: "https://book".into(),
        };

        let briefs = stage_briefs(&context, &links, "Demo Booking", "Register");
        assert_eq!(briefs.len(), 3);

        assert_eq!(briefs[0].cta_button, "Learn More");
        assert_eq!(briefs[0].destination, "https://learn");
        assert!(briefs[0].primary_context.contains("Water filters"));
        assert!(briefs[0].primary_context.contains("Additional Context: N/A"));

        assert_eq!(briefs[1].cta_button, "Download");
        assert_eq!(briefs[1].destination, "https://magnet");
        assert!(briefs[1].primary_context.contains("Filter buying guide"));

        assert_eq!(briefs[2].cta_button, "Register");
        assert_eq!(briefs[2].destination, "https://book");
        assert_eq!(briefs[2].primary_context, "Lead Objective: Demo Booking");
    }
}
