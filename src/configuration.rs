use std::time::Duration;

use config::{Config, ConfigError, Environment as EnvSource, File};
use serde::Deserialize;
use serde_aux::field_attributes::deserialize_number_from_string;

#[derive(Deserialize, Clone)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub api_keys: ApiKeySettings,
    pub openai: OpenaiSettings,
    pub search: SearchSettings,
    pub fetcher: FetcherSettings,
    pub scout: ScoutSettings,
}

#[derive(Deserialize, Clone)]
pub struct ApplicationSettings {
    pub host: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub port: u16,
}

#[derive(Deserialize, Clone, Default)]
pub struct ApiKeySettings {
    pub openai: Option<String>,
}

impl ApiKeySettings {
    /// Blank keys count as missing.
    pub fn openai_key(&self) -> Option<&str> {
        self.openai
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
    }
}

#[derive(Deserialize, Clone)]
pub struct OpenaiSettings {
    pub model: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub max_tokens: u32,
}

#[derive(Deserialize, Clone)]
pub struct SearchSettings {
    pub base_url: String,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_secs: u64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub result_delay_millis: u64,
    pub proxy: Option<String>,
}

impl SearchSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn result_delay(&self) -> Duration {
        Duration::from_millis(self.result_delay_millis)
    }
}

#[derive(Deserialize, Clone)]
pub struct FetcherSettings {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub timeout_secs: u64,
}

impl FetcherSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[derive(Deserialize, Clone)]
pub struct ScoutSettings {
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub url_delay_millis: u64,
    #[serde(deserialize_with = "deserialize_number_from_string")]
    pub per_query_limit: usize,
}

impl ScoutSettings {
    pub fn url_delay(&self) -> Duration {
        Duration::from_millis(self.url_delay_millis)
    }
}

pub enum AppEnvironment {
    Local,
    Production,
}

impl AppEnvironment {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppEnvironment::Local => "local",
            AppEnvironment::Production => "production",
        }
    }
}

impl TryFrom<String> for AppEnvironment {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "production" => Ok(Self::Production),
            other => Err(format!(
                "{} is not a supported environment. Use either `local` or `production`.",
                other
            )),
        }
    }
}

pub fn get_configuration() -> Result<Settings, ConfigError> {
    let base_path = std::env::current_dir()
        .map_err(|e| ConfigError::Message(format!("Failed to determine current dir: {}", e)))?;
    let configuration_directory = base_path.join("configuration");

    let environment: AppEnvironment = std::env::var("APP_ENVIRONMENT")
        .unwrap_or_else(|_| "local".into())
        .try_into()
        .map_err(ConfigError::Message)?;
    let environment_filename = format!("{}.yaml", environment.as_str());

    let settings = Config::builder()
        .add_source(File::from(configuration_directory.join("base.yaml")))
        .add_source(File::from(configuration_directory.join(environment_filename)).required(false))
        // e.g. `APP_APPLICATION__PORT=5001` sets `Settings.application.port`
        .add_source(
            EnvSource::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .set_override_option("api_keys.openai", std::env::var("OPENAI_API_KEY").ok())?
        .build()?;

    settings.try_deserialize::<Settings>()
}
