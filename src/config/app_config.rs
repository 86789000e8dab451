use std::collections::BTreeMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::domain::DomainError;

/// Application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub providers: ProvidersConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Settings for every known provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProvidersConfig {
    pub openai: ProviderSettings,
    pub anthropic: ProviderSettings,
}

/// Settings for one provider. The API key itself is read from the
/// environment variable named by `api_key_env`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProviderSettings {
    pub enabled: bool,
    pub base_url: String,
    pub timeout_ms: u64,
    /// Lower runs first
    pub priority: u32,
    /// Empty means the adapter's built-in model list
    #[serde(default)]
    pub models: Vec<String>,
    pub api_key_env: String,
    /// Per-model prices layered over the built-in table
    #[serde(default)]
    pub pricing: BTreeMap<String, PriceSettings>,
}

/// Configured price for one model, in USD per 1K tokens
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct PriceSettings {
    pub input_per_1k: f64,
    pub output_per_1k: f64,
}

impl ProviderSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    fn validate(&self, name: &str) -> Result<(), DomainError> {
        if self.timeout_ms == 0 {
            return Err(DomainError::validation(format!(
                "providers.{}.timeout_ms must be greater than zero",
                name
            )));
        }

        if !self.base_url.starts_with("http://") && !self.base_url.starts_with("https://") {
            return Err(DomainError::validation(format!(
                "providers.{}.base_url must be an http(s) URL, got '{}'",
                name, self.base_url
            )));
        }

        if let Some((model, _)) = self
            .pricing
            .iter()
            .find(|(_, price)| !(price.input_per_1k >= 0.0 && price.output_per_1k >= 0.0))
        {
            return Err(DomainError::validation(format!(
                "providers.{}.pricing.{} must have non-negative prices",
                name, model
            )));
        }

        Ok(())
    }

    fn openai() -> Self {
        Self {
            enabled: true,
            base_url: "https://api.openai.com".to_string(),
            timeout_ms: 30_000,
            priority: 1,
            models: Vec::new(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            pricing: BTreeMap::new(),
        }
    }

    fn anthropic() -> Self {
        Self {
            enabled: true,
            base_url: "https://api.anthropic.com".to_string(),
            timeout_ms: 60_000,
            priority: 2,
            models: Vec::new(),
            api_key_env: "ANTHROPIC_API_KEY".to_string(),
            pricing: BTreeMap::new(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            openai: ProviderSettings::openai(),
            anthropic: ProviderSettings::anthropic(),
        }
    }
}

impl AppConfig {
    /// Load built-in defaults, then `config/default` and `config/local`
    /// files, then `APP__*` environment variables.
    pub fn load() -> Result<Self, DomainError> {
        let config: Self = Self::sources()
            .and_then(|c| c.try_deserialize())
            .map_err(|e| DomainError::configuration(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), DomainError> {
        self.providers.openai.validate("openai")?;
        self.providers.anthropic.validate("anthropic")
    }

    fn sources() -> Result<config::Config, config::ConfigError> {
        let defaults = config::Config::try_from(&AppConfig::default())?;

        config::Config::builder()
            .add_source(defaults)
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("providers.openai.models")
                    .with_list_parse_key("providers.anthropic.models")
                    .try_parsing(true),
            )
            .build()
    }
}
