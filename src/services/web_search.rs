use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use itertools::Itertools;
use scraper::{Html, Selector};
use serde::Serialize;
use url::Url;

use crate::configuration::SearchSettings;

/// Source of candidate URLs for a search query.
#[async_trait]
pub trait WebSearch: Send + Sync {
    /// Returns at most `limit` URLs in result order. A failed search yields an
    /// empty list instead of an error.
    async fn search(&self, query: &str, limit: usize) -> Vec<String>;
}

#[derive(Serialize)]
struct GoogleQuery<'a> {
    q: &'a str,
    num: usize,
    hl: &'static str,
}

pub struct GoogleSearch {
    client: reqwest::Client,
    base_url: String,
    result_delay: Duration,
}

impl GoogleSearch {
    pub fn new(settings: &SearchSettings) -> anyhow::Result<Self> {
        let mut builder = reqwest::Client::builder()
            .user_agent(fake_user_agent::get_rua())
            .read_timeout(settings.timeout())
            .timeout(settings.timeout());

        if let Some(proxy) = settings.proxy.as_deref().filter(|p| !p.trim().is_empty()) {
            builder = builder.proxy(reqwest::Proxy::all(proxy).context("Invalid search proxy")?);
        }

        Ok(GoogleSearch {
            client: builder.build().context("Failed to build search client")?,
            base_url: settings.base_url.clone(),
            result_delay: settings.result_delay(),
        })
    }

    async fn fetch_results_page(&self, query: &str, limit: usize) -> anyhow::Result<String> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&GoogleQuery {
                q: query,
                num: limit,
                hl: "en",
            })
            .send()
            .await?
            .error_for_status()?;

        Ok(response.text().await?)
    }
}

#[async_trait]
impl WebSearch for GoogleSearch {
    async fn search(&self, query: &str, limit: usize) -> Vec<String> {
        let html_content = match self.fetch_results_page(query, limit).await {
            Ok(html_content) => html_content,
            Err(e) => {
                log::error!("Search failed for query '{}': {:?}", query, e);
                return vec![];
            }
        };

        let mut urls = vec![];
        for url in extract_result_urls(&html_content).into_iter().take(limit) {
            urls.push(url);
            tokio::time::sleep(self.result_delay).await;
        }

        log::info!("Found {} urls for query '{}'", urls.len(), query);
        urls
    }
}

/// Organic result links of a results page, first occurrence only.
pub fn extract_result_urls(html_content: &str) -> Vec<String> {
    let html_document = Html::parse_document(html_content);
    let Ok(a_tag_selector) = Selector::parse("a[href]") else {
        return vec![];
    };

    html_document
        .select(&a_tag_selector)
        .filter_map(|tag| tag.value().attr("href"))
        .filter_map(result_url_from_href)
        .unique()
        .collect()
}

fn result_url_from_href(href: &str) -> Option<String> {
    let target = match href.strip_prefix("/url?") {
        Some(params) => url::form_urlencoded::parse(params.as_bytes())
            .find(|(key, _)| key == "q" || key == "url")
            .map(|(_, value)| value.into_owned())?,
        None => href.to_string(),
    };

    let parsed_url = Url::parse(&target).ok()?;
    if !matches!(parsed_url.scheme(), "http" | "https") {
        return None;
    }

    match parsed_url.host_str() {
        None | Some("") => None,
        Some(host) if is_search_engine_host(host) => None,
        Some(_) => Some(target),
    }
}

fn is_search_engine_host(host: &str) -> bool {
    host.contains("google.")
        || host.ends_with("gstatic.com")
        || host.ends_with("googleusercontent.com")
}
