use anyhow::anyhow;
use async_openai::{
    config::OpenAIConfig,
    types::{ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs},
    Client,
};
use async_trait::async_trait;

use crate::configuration::{ApiKeySettings, OpenaiSettings};

/// Prompt in, free-form text out.
#[async_trait]
pub trait LlmCollaborator: Send + Sync {
    async fn complete(&self, prompt: &str) -> anyhow::Result<String>;
}

pub struct OpenaiClient {
    client: Client<OpenAIConfig>,
    model: String,
    max_tokens: u32,
}

impl OpenaiClient {
    pub fn new(api_key: &str, settings: &OpenaiSettings) -> Self {
        let config = OpenAIConfig::new().with_api_key(api_key);
        OpenaiClient {
            client: Client::with_config(config),
            model: settings.model.clone(),
            max_tokens: settings.max_tokens,
        }
    }

    /// `None` when no API key is configured, leaving extraction unavailable.
    pub fn from_settings(api_keys: &ApiKeySettings, settings: &OpenaiSettings) -> Option<Self> {
        match api_keys.openai_key() {
            Some(api_key) => Some(OpenaiClient::new(api_key, settings)),
            None => {
                log::warn!("No OpenAI API key configured, LLM extraction is unavailable");
                None
            }
        }
    }
}

#[async_trait]
impl LlmCollaborator for OpenaiClient {
    async fn complete(&self, prompt: &str) -> anyhow::Result<String> {
        let request = CreateChatCompletionRequestArgs::default()
            .model(self.model.as_str())
            .messages([ChatCompletionRequestUserMessageArgs::default()
                .content(prompt)
                .build()?
                .into()])
            .max_tokens(self.max_tokens)
            .build()?;

        let response = self.client.chat().create(request).await?;
        log::debug!("Response: {:?}", response);

        response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| anyhow!("No choices in Openai response"))?
            .message
            .content
            .ok_or_else(|| anyhow!("No content in Openai response"))
    }
}
