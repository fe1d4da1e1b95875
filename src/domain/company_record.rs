use serde::{Deserialize, Serialize};
use serde_json::Value;

pub const FALLBACK_EXCERPT_CHARS: usize = 500;

/// Keys the LLM is asked to fill, in prompt order.
pub const EXTRACTION_FIELDS: [&str; 12] = [
    "company_name",
    "primary_technology_focus",
    "country_city",
    "employee_count_estimation",
    "revenue_estimation",
    "EBITDA_estimation",
    "oem_certifications",
    "foundation_year",
    "is_potential_seller_signals",
    "is_potential_buyer_signals",
    "past_acquisitions_mentioned",
    "summary_relevance_to_ma",
];

pub const SOURCE_URL: &str = "source_url";
pub const SEARCH_QUERY_ORIGIN: &str = "search_query_origin";
pub const FALLBACK_SUMMARY: &str = "fallback_summary";
pub const LLM_STATUS: &str = "llm_status";

/// Company facts as returned by the LLM. Every field is optional and keeps
/// whatever JSON shape the model chose (string, number, bool or list).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompanyProfile {
    pub company_name: Option<Value>,
    pub primary_technology_focus: Option<Value>,
    pub country_city: Option<Value>,
    pub employee_count_estimation: Option<Value>,
    pub revenue_estimation: Option<Value>,
    #[serde(rename = "EBITDA_estimation")]
    pub ebitda_estimation: Option<Value>,
    pub oem_certifications: Option<Value>,
    pub foundation_year: Option<Value>,
    pub is_potential_seller_signals: Option<Value>,
    pub is_potential_buyer_signals: Option<Value>,
    pub past_acquisitions_mentioned: Option<Value>,
    pub summary_relevance_to_ma: Option<Value>,
}

impl CompanyProfile {
    fn values(&self) -> [&Option<Value>; 12] {
        [
            &self.company_name,
            &self.primary_technology_focus,
            &self.country_city,
            &self.employee_count_estimation,
            &self.revenue_estimation,
            &self.ebitda_estimation,
            &self.oem_certifications,
            &self.foundation_year,
            &self.is_potential_seller_signals,
            &self.is_potential_buyer_signals,
            &self.past_acquisitions_mentioned,
            &self.summary_relevance_to_ma,
        ]
    }

    /// True when the model filled none of the named fields.
    pub fn is_empty(&self) -> bool {
        self.values().iter().all(|value| value.is_none())
    }

    /// Fields the model actually filled, as `(column, cell)` pairs.
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        EXTRACTION_FIELDS
            .iter()
            .zip(self.values())
            .filter_map(|(name, value)| value.as_ref().map(|v| (*name, render_value(v))))
            .collect()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LlmStatus {
    Success,
    Fallback,
}

impl LlmStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LlmStatus::Success => "success",
            LlmStatus::Fallback => "fallback",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CompanyRecord {
    Extracted {
        profile: CompanyProfile,
        source_url: String,
        search_query_origin: String,
    },
    Fallback {
        source_url: String,
        search_query_origin: String,
        fallback_summary: String,
    },
}

impl CompanyRecord {
    pub fn extracted(profile: CompanyProfile, source_url: &str, query: &str) -> Self {
        CompanyRecord::Extracted {
            profile,
            source_url: source_url.to_string(),
            search_query_origin: query.to_string(),
        }
    }

    /// Keeps only the first [`FALLBACK_EXCERPT_CHARS`] characters of `page_text`.
    pub fn fallback(source_url: &str, query: &str, page_text: &str) -> Self {
        CompanyRecord::Fallback {
            source_url: source_url.to_string(),
            search_query_origin: query.to_string(),
            fallback_summary: page_text.chars().take(FALLBACK_EXCERPT_CHARS).collect(),
        }
    }

    pub fn source_url(&self) -> &str {
        match self {
            CompanyRecord::Extracted { source_url, .. } => source_url,
            CompanyRecord::Fallback { source_url, .. } => source_url,
        }
    }

    pub fn search_query_origin(&self) -> &str {
        match self {
            CompanyRecord::Extracted {
                search_query_origin,
                ..
            } => search_query_origin,
            CompanyRecord::Fallback {
                search_query_origin,
                ..
            } => search_query_origin,
        }
    }

    pub fn status(&self) -> LlmStatus {
        match self {
            CompanyRecord::Extracted { .. } => LlmStatus::Success,
            CompanyRecord::Fallback { .. } => LlmStatus::Fallback,
        }
    }

    /// The row this record contributes to the result table.
    pub fn fields(&self) -> Vec<(&'static str, String)> {
        match self {
            CompanyRecord::Extracted {
                profile,
                source_url,
                search_query_origin,
            } => {
                let mut fields = profile.fields();
                fields.push((SOURCE_URL, source_url.clone()));
                fields.push((SEARCH_QUERY_ORIGIN, search_query_origin.clone()));
                fields.push((LLM_STATUS, self.status().as_str().to_string()));
                fields
            }
            CompanyRecord::Fallback {
                source_url,
                search_query_origin,
                fallback_summary,
            } => vec![
                (SOURCE_URL, source_url.clone()),
                (SEARCH_QUERY_ORIGIN, search_query_origin.clone()),
                (FALLBACK_SUMMARY, fallback_summary.clone()),
                (LLM_STATUS, self.status().as_str().to_string()),
            ],
        }
    }
}

fn render_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Array(items) => items
            .iter()
            .map(render_value)
            .filter(|s| !s.is_empty())
            .collect::<Vec<String>>()
            .join(", "),
        other => other.to_string(),
    }
}
