use super::{or_not_provided, output_contract, PromptContext};
use crate::types::channel::{Channel, GOOGLE_DISPLAY_ITEMS};
use crate::types::request::RequestSpec;

const SYSTEM_PROMPT: &str = "You are an expert marketing copywriter specializing in Google Display ads. \
Generate ad components in JSON format. Ensure the JSON is valid and contains all requested fields as specified.";

/// One request for 5 headline/description pairs.
pub fn google_display_requests(context: &PromptContext) -> Vec<RequestSpec> {
    let root_key = Channel::GoogleDisplay.schema().root_key;

    let items: Vec<String> = (1..=GOOGLE_DISPLAY_ITEMS)
        .map(|i| {
            format!(
                r#"    {{ "Headline": "Headline {i} (<=30 chars)", "Description": "Description {i} (<=90 chars)" }}"#
            )
        })
        .collect();

    let user = format!(
        r#"Task: Generate Google Display ad components.

Company Context:
- URL Summary: {url}
- Additional Info Summary: {additional}

Requirements:
- Generate {GOOGLE_DISPLAY_ITEMS} ad variations.
- For each variation, provide one Headline (MUST be approximately 30 characters or less) and one Description (MUST be approximately 90 characters or less). Both fields MUST be non-empty.

{contract}

Example:
{{
  "{root_key}": [
{items}
  ]
}}"#,
        url = or_not_provided(&context.url_summary),
        additional = or_not_provided(&context.additional_summary),
        contract = output_contract(root_key, GOOGLE_DISPLAY_ITEMS),
        items = items.join(",\n"),
    );

    vec![RequestSpec::new(
        Channel::GoogleDisplay,
        None,
        SYSTEM_PROMPT,
        user,
        GOOGLE_DISPLAY_ITEMS,
    )]
}
