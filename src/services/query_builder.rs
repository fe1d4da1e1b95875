use crate::domain::{Profile, ScoutingParams};

pub fn build_search_queries(
    profile: Profile,
    industry: &str,
    technology: &str,
    region: &str,
    deal_size: &str,
    additional_keywords: &str,
) -> Vec<String> {
    let keyword_chunk = format!(
        "{} {} {} {} {}",
        industry, technology, region, deal_size, additional_keywords
    );
    let keyword_chunk = keyword_chunk.trim();

    let intent = match profile {
        Profile::Buyers => "companies buying",
        Profile::Sellers => "companies for sale",
    };

    [
        "M&A news",
        intent,
        "acquisition targets",
        "strategic investment",
        "merger discussions",
    ]
    .iter()
    .map(|suffix| format!("{} {}", keyword_chunk, suffix))
    .filter(|query| !query.trim().is_empty())
    .collect()
}

pub fn build_queries_for(params: &ScoutingParams) -> Vec<String> {
    build_search_queries(
        params.profile,
        &params.industry,
        &params.technology,
        &params.region,
        &params.deal_size,
        &params.additional_keywords,
    )
}
