use anyhow::Context;
use serde_json::Value;

use crate::domain::CompanyProfile;

use super::LlmCollaborator;

pub const MAX_PROMPT_TEXT_CHARS: usize = 15_000;

pub fn build_extraction_prompt(page_text: &str, source_url: &str) -> String {
    let excerpt: String = page_text.chars().take(MAX_PROMPT_TEXT_CHARS).collect();

    format!(
        r#"
    Analyze the following text from {} and extract M&A-related information.
    Respond ONLY in proper JSON format with the following fields:
    "company_name", "primary_technology_focus", "country_city", "employee_count_estimation",
    "revenue_estimation", "EBITDA_estimation", "oem_certifications", "foundation_year",
    "is_potential_seller_signals", "is_potential_buyer_signals", "past_acquisitions_mentioned",
    "summary_relevance_to_ma".
    ---
    {}
    "#,
        source_url, excerpt
    )
}

/// Removes a leading ```` ```json ```` and a trailing ```` ``` ```` fence.
pub fn strip_code_fence(response: &str) -> &str {
    let response = response.trim();
    let response = response.strip_prefix("```json").unwrap_or(response);
    let response = response.strip_suffix("```").unwrap_or(response);
    response.trim()
}

pub fn parse_company_profile(response: &str) -> anyhow::Result<CompanyProfile> {
    let value: Value =
        serde_json::from_str(strip_code_fence(response)).context("LLM response is not JSON")?;

    let profile: CompanyProfile = match value {
        Value::Object(_) => {
            serde_json::from_value(value).context("LLM response does not match the schema")?
        }
        other => anyhow::bail!("LLM response is not a JSON object: {}", other),
    };

    if profile.is_empty() {
        anyhow::bail!("LLM response names none of the company fields");
    }

    Ok(profile)
}

/// Asks the LLM for the company profile behind `page_text`. `None` means the
/// caller should fall back to the raw text; failures are logged, not raised.
pub async fn extract_company_profile(
    llm: Option<&dyn LlmCollaborator>,
    page_text: &str,
    source_url: &str,
) -> Option<CompanyProfile> {
    let llm = llm?;
    if page_text.is_empty() {
        return None;
    }

    let prompt = build_extraction_prompt(page_text, source_url);
    match llm
        .complete(&prompt)
        .await
        .and_then(|response| parse_company_profile(&response))
    {
        Ok(profile) => Some(profile),
        Err(e) => {
            log::error!("LLM Error for {}: {:?}", source_url, e);
            None
        }
    }
}
