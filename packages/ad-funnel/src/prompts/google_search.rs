use super::{or_not_provided, output_contract, PromptContext};
use crate::types::channel::{Channel, GOOGLE_SEARCH_DESCRIPTIONS, GOOGLE_SEARCH_ITEMS};
use crate::types::request::RequestSpec;

const SYSTEM_PROMPT: &str = "You are an expert marketing copywriter specializing in Google Search ads. \
Generate ad components in JSON format. Ensure the JSON is valid and contains all requested fields as specified.";

/// One request for 15 headlines, the first four paired with a description.
pub fn google_search_requests(context: &PromptContext) -> Vec<RequestSpec> {
    let root_key = Channel::GoogleSearch.schema().root_key;

    let items: Vec<String> = (1..=GOOGLE_SEARCH_ITEMS)
        .map(|i| {
            let description = if i <= GOOGLE_SEARCH_DESCRIPTIONS {
                format!("Description {} (<=90 chars)", i)
            } else {
                String::new()
            };
            format!(
                r#"    {{ "Headline": "Headline {} (<=30 chars)", "Description": "{}" }}"#,
                i, description
            )
        })
        .collect();

    let user = format!(
        r#"Task: Generate Google Search ad components.

Company Context:
- URL Summary: {url}
- Additional Info Summary: {additional}

Requirements:
- Generate {GOOGLE_SEARCH_ITEMS} unique Headlines. Each headline MUST be approximately 30 characters or less.
- Generate {GOOGLE_SEARCH_DESCRIPTIONS} unique Descriptions. Each description MUST be approximately 90 characters or less. These descriptions correspond to the first {GOOGLE_SEARCH_DESCRIPTIONS} headlines.

{contract}
The "Description" field for items {first_blank} through {GOOGLE_SEARCH_ITEMS} MUST be an empty string "".

Example:
{{
  "{root_key}": [
{items}
  ]
}}"#,
        url = or_not_provided(&context.url_summary),
        additional = or_not_provided(&context.additional_summary),
        contract = output_contract(root_key, GOOGLE_SEARCH_ITEMS),
        first_blank = GOOGLE_SEARCH_DESCRIPTIONS + 1,
        items = items.join(",\n"),
    );

    vec![RequestSpec::new(
        Channel::GoogleSearch,
        None,
        SYSTEM_PROMPT,
        user,
        GOOGLE_SEARCH_ITEMS,
    )]
}
