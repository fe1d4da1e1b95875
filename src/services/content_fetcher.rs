use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use scraper::{Html, Node};

/// Turns a URL into the visible text of the page behind it.
#[async_trait]
pub trait ContentFetcher: Send + Sync {
    /// `None` on any transport error or non-success status.
    async fn fetch_text(&self, url: &str) -> Option<String>;
}

pub struct HttpContentFetcher {
    client: reqwest::Client,
}

impl HttpContentFetcher {
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(fake_user_agent::get_rua())
            .timeout(timeout)
            .build()
            .context("Failed to build page fetch client")?;

        Ok(HttpContentFetcher { client })
    }

    async fn fetch_html(&self, url: &str) -> anyhow::Result<String> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("HTTP request failed")?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("HTTP {} for {}", status, url);
        }

        response
            .text()
            .await
            .context("Failed to read response body")
    }
}

#[async_trait]
impl ContentFetcher for HttpContentFetcher {
    async fn fetch_text(&self, url: &str) -> Option<String> {
        match self.fetch_html(url).await {
            Ok(html_content) => Some(extract_visible_text(&html_content)),
            Err(e) => {
                log::error!("Error fetching or parsing {}: {:?}", url, e);
                None
            }
        }
    }
}

/// Every text node outside `<script>` and `<style>`, trimmed and joined by
/// single spaces.
pub fn extract_visible_text(html_content: &str) -> String {
    let html_document = Html::parse_document(html_content);

    html_document
        .tree
        .root()
        .descendants()
        .filter_map(|node| match node.value() {
            Node::Text(text) => {
                let hidden = node.ancestors().any(|ancestor| {
                    ancestor
                        .value()
                        .as_element()
                        .is_some_and(|element| matches!(element.name(), "script" | "style"))
                });
                match hidden {
                    true => None,
                    false => Some(text.trim()),
                }
            }
            _ => None,
        })
        .filter(|text| !text.is_empty())
        .collect::<Vec<&str>>()
        .join(" ")
}
