use std::{collections::HashSet, sync::Arc, time::Duration};

use crate::domain::{CompanyRecord, ResultSet, ScoutingParams, DEFAULT_PER_QUERY_LIMIT};

use super::{
    build_queries_for, extract_company_profile, ContentFetcher, LlmCollaborator, WebSearch,
};

/// Pages with this many characters of text or fewer are skipped.
pub const MIN_CONTENT_CHARS: usize = 200;

#[derive(Debug, thiserror::Error)]
pub enum ScoutError {
    #[error("LLM model not available. Check your API key.")]
    LlmUnavailable,
}

/// Drives one scouting run: queries, search, fetch, extraction, aggregation.
pub struct Scout {
    search: Arc<dyn WebSearch>,
    fetcher: Arc<dyn ContentFetcher>,
    llm: Option<Arc<dyn LlmCollaborator>>,
    url_delay: Duration,
    default_limit: usize,
}

impl Scout {
    pub fn new(
        search: Arc<dyn WebSearch>,
        fetcher: Arc<dyn ContentFetcher>,
        llm: Option<Arc<dyn LlmCollaborator>>,
        url_delay: Duration,
    ) -> Self {
        Scout {
            search,
            fetcher,
            llm,
            url_delay,
            default_limit: DEFAULT_PER_QUERY_LIMIT,
        }
    }

    /// Per-query limit used when a caller does not pick one. Zero is ignored.
    pub fn with_default_limit(mut self, default_limit: usize) -> Self {
        if default_limit > 0 {
            self.default_limit = default_limit;
        }
        self
    }

    pub fn default_limit(&self) -> usize {
        self.default_limit
    }

    pub fn llm_available(&self) -> bool {
        self.llm.is_some()
    }

    /// Runs every query strictly in sequence. Each URL is fetched at most once
    /// per run, even when several queries return it.
    pub async fn run(&self, params: &ScoutingParams) -> Result<ResultSet, ScoutError> {
        let Some(llm) = self.llm.as_deref() else {
            log::error!("Refusing to scout for {}: no LLM configured", params.profile);
            return Err(ScoutError::LlmUnavailable);
        };

        let mut result_set = ResultSet::default();
        let mut processed_urls: HashSet<String> = HashSet::new();

        for query in build_queries_for(params) {
            let urls = self.search.search(&query, params.per_query_limit).await;
            log::info!("Query '{}' returned {} candidate urls", query, urls.len());

            for url in urls {
                if !processed_urls.insert(url.clone()) {
                    continue;
                }

                if let Some(record) = self.scout_url(llm, &url, &query).await {
                    result_set.push(record);
                }

                tokio::time::sleep(self.url_delay).await;
            }
        }

        log::info!(
            "Scouting finished with {} records from {} urls",
            result_set.len(),
            processed_urls.len()
        );

        Ok(result_set)
    }

    async fn scout_url(
        &self,
        llm: &dyn LlmCollaborator,
        url: &str,
        query: &str,
    ) -> Option<CompanyRecord> {
        let text = self.fetcher.fetch_text(url).await?;

        let text_len = text.chars().count();
        if text_len <= MIN_CONTENT_CHARS {
            log::info!("Skipping {}: only {} characters of text", url, text_len);
            return None;
        }

        let record = match extract_company_profile(Some(llm), &text, url).await {
            Some(profile) => CompanyRecord::extracted(profile, url, query),
            None => CompanyRecord::fallback(url, query, &text),
        };

        Some(record)
    }
}

#[cfg(test)]
mod tests {
    use std::{
        collections::HashMap,
        sync::{Arc, Mutex},
        time::Duration,
    };

    use anyhow::anyhow;
    use async_trait::async_trait;

    use crate::{
        domain::{
            CompanyRecord, LlmStatus, Profile, ScoutingParams, DEFAULT_PER_QUERY_LIMIT,
            FALLBACK_EXCERPT_CHARS,
        },
        services::{ContentFetcher, LlmCollaborator, WebSearch},
    };

    use super::{Scout, ScoutError, MIN_CONTENT_CHARS};

    /// Returns the urls registered for the first suffix the query ends with.
    struct StubSearch {
        results: Vec<(&'static str, Vec<&'static str>)>,
        limits: Mutex<Vec<usize>>,
    }

    #[async_trait]
    impl WebSearch for StubSearch {
        async fn search(&self, query: &str, limit: usize) -> Vec<String> {
            self.limits.lock().unwrap().push(limit);
            self.results
                .iter()
                .find(|(suffix, _)| query.ends_with(suffix))
                .map(|(_, urls)| urls.iter().map(|u| u.to_string()).collect())
                .unwrap_or_default()
        }
    }

    struct StubFetcher {
        pages: HashMap<&'static str, String>,
        fetched: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ContentFetcher for StubFetcher {
        async fn fetch_text(&self, url: &str) -> Option<String> {
            self.fetched.lock().unwrap().push(url.to_string());
            self.pages.get(url).cloned()
        }
    }

    /// Answers with JSON naming the company after the first word of the page,
    /// garbage when the page mentions "garbled" and an empty object for
    /// "anonymous" pages.
    struct StubLlm;

    #[async_trait]
    impl LlmCollaborator for StubLlm {
        async fn complete(&self, prompt: &str) -> anyhow::Result<String> {
            if prompt.contains("garbled") {
                return Ok("I could not find any company here.".to_string());
            }
            if prompt.contains("offline") {
                return Err(anyhow!("connection reset"));
            }
            if prompt.contains("anonymous") {
                return Ok("```json\n{}\n```".to_string());
            }
            let name = prompt
                .split("---")
                .nth(1)
                .and_then(|page| page.split_whitespace().next())
                .unwrap_or("unknown");
            Ok(format!("```json\n{{\"company_name\": \"{}\"}}\n```", name))
        }
    }

    fn page(first_word: &str) -> String {
        format!("{} {}", first_word, "x".repeat(MIN_CONTENT_CHARS))
    }

    fn buyer_params() -> ScoutingParams {
        ScoutingParams {
            industry: "Fintech".to_string(),
            technology: "AWS".to_string(),
            region: "India".to_string(),
            deal_size: "10M-100M".to_string(),
            additional_keywords: "Bangalore, acquisition".to_string(),
            per_query_limit: 3,
            ..ScoutingParams::new(Profile::Buyers)
        }
    }

    fn scout(search: Arc<StubSearch>, fetcher: Arc<StubFetcher>) -> Scout {
        Scout::new(search, fetcher, Some(Arc::new(StubLlm)), Duration::ZERO)
    }

    fn stub_search(results: Vec<(&'static str, Vec<&'static str>)>) -> Arc<StubSearch> {
        Arc::new(StubSearch {
            results,
            limits: Mutex::new(vec![]),
        })
    }

    fn stub_fetcher(pages: Vec<(&'static str, String)>) -> Arc<StubFetcher> {
        Arc::new(StubFetcher {
            pages: pages.into_iter().collect(),
            fetched: Mutex::new(vec![]),
        })
    }

    #[tokio::test]
    async fn missing_llm_fails_before_searching() {
        let search = stub_search(vec![("M&A news", vec!["https://acme.io"])]);
        let fetcher = stub_fetcher(vec![]);
        let scout = Scout::new(search.clone(), fetcher.clone(), None, Duration::ZERO);

        let result = scout.run(&buyer_params()).await;

        assert!(matches!(result, Err(ScoutError::LlmUnavailable)));
        assert!(search.limits.lock().unwrap().is_empty());
        assert!(!scout.llm_available());
    }

    #[tokio::test]
    async fn empty_search_results_give_empty_result_set() {
        let search = stub_search(vec![]);
        let fetcher = stub_fetcher(vec![]);

        let result_set = scout(search.clone(), fetcher.clone())
            .run(&buyer_params())
            .await
            .unwrap();

        assert!(result_set.is_empty());
        assert_eq!(*search.limits.lock().unwrap(), vec![3, 3, 3, 3, 3]);
        assert!(fetcher.fetched.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn urls_are_fetched_once_across_queries() {
        let search = stub_search(vec![
            ("M&A news", vec!["https://acme.io", "https://beta.in"]),
            ("companies buying", vec!["https://beta.in", "https://gamma.com"]),
            ("merger discussions", vec!["https://acme.io"]),
        ]);
        let fetcher = stub_fetcher(vec![
            ("https://acme.io", page("Acme")),
            ("https://beta.in", page("Beta")),
            ("https://gamma.com", page("Gamma")),
        ]);

        let result_set = scout(search, fetcher.clone())
            .run(&buyer_params())
            .await
            .unwrap();

        assert_eq!(
            *fetcher.fetched.lock().unwrap(),
            vec!["https://acme.io", "https://beta.in", "https://gamma.com"]
        );

        let provenance: Vec<(&str, &str)> = result_set
            .records()
            .iter()
            .map(|r| (r.source_url(), r.search_query_origin()))
            .collect();
        assert_eq!(
            provenance,
            vec![
                (
                    "https://acme.io",
                    "Fintech AWS India 10M-100M Bangalore, acquisition M&A news"
                ),
                (
                    "https://beta.in",
                    "Fintech AWS India 10M-100M Bangalore, acquisition M&A news"
                ),
                (
                    "https://gamma.com",
                    "Fintech AWS India 10M-100M Bangalore, acquisition companies buying"
                ),
            ]
        );
        assert!(result_set
            .records()
            .iter()
            .all(|r| r.status() == LlmStatus::Success));
    }

    #[tokio::test]
    async fn short_and_failed_pages_emit_nothing() {
        let search = stub_search(vec![(
            "M&A news",
            vec![
                "https://short.io",
                "https://exact.io",
                "https://down.io",
                "https://acme.io",
            ],
        )]);
        let fetcher = stub_fetcher(vec![
            ("https://short.io", "too short".to_string()),
            ("https://exact.io", "y".repeat(MIN_CONTENT_CHARS)),
            ("https://acme.io", page("Acme")),
        ]);

        let result_set = scout(search, fetcher.clone())
            .run(&buyer_params())
            .await
            .unwrap();

        assert_eq!(fetcher.fetched.lock().unwrap().len(), 4);
        assert_eq!(result_set.len(), 1);
        assert_eq!(result_set.records()[0].source_url(), "https://acme.io");
    }

    #[tokio::test]
    async fn extraction_failures_fall_back_to_page_excerpt() {
        let search = stub_search(vec![(
            "acquisition targets",
            vec!["https://garbled.io", "https://offline.io", "https://acme.io"],
        )]);
        let long_page = format!("garbled {}", "z".repeat(2_000));
        let fetcher = stub_fetcher(vec![
            ("https://garbled.io", long_page.clone()),
            ("https://offline.io", page("offline")),
            ("https://acme.io", page("Acme")),
        ]);

        let result_set = scout(search, fetcher)
            .run(&buyer_params())
            .await
            .unwrap();

        let statuses: Vec<LlmStatus> = result_set.records().iter().map(|r| r.status()).collect();
        assert_eq!(
            statuses,
            vec![LlmStatus::Fallback, LlmStatus::Fallback, LlmStatus::Success]
        );

        let CompanyRecord::Fallback {
            fallback_summary,
            search_query_origin,
            ..
        } = &result_set.records()[0]
        else {
            panic!("expected fallback record");
        };
        assert_eq!(fallback_summary.chars().count(), FALLBACK_EXCERPT_CHARS);
        assert!(long_page.starts_with(fallback_summary.as_str()));
        assert!(search_query_origin.ends_with("acquisition targets"));

        let CompanyRecord::Extracted { profile, .. } = &result_set.records()[2] else {
            panic!("expected extracted record");
        };
        assert_eq!(profile.company_name, Some(serde_json::json!("Acme")));
    }

    #[tokio::test]
    async fn empty_extraction_keeps_the_page_excerpt() {
        let search = stub_search(vec![("M&A news", vec!["https://anonymous.io"])]);
        let text = format!("anonymous {}", "w".repeat(290));
        let fetcher = stub_fetcher(vec![("https://anonymous.io", text.clone())]);

        let result_set = scout(search, fetcher)
            .run(&buyer_params())
            .await
            .unwrap();

        assert_eq!(result_set.len(), 1);
        let CompanyRecord::Fallback {
            fallback_summary, ..
        } = &result_set.records()[0]
        else {
            panic!("expected fallback record");
        };
        assert_eq!(fallback_summary, &text);
    }

    #[test]
    fn default_limit_follows_configuration_unless_zero() {
        let configured = scout(stub_search(vec![]), stub_fetcher(vec![])).with_default_limit(8);
        let zero = scout(stub_search(vec![]), stub_fetcher(vec![])).with_default_limit(0);

        assert_eq!(configured.default_limit(), 8);
        assert_eq!(zero.default_limit(), DEFAULT_PER_QUERY_LIMIT);
    }
}
