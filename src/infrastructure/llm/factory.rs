use std::sync::Arc;

use tracing::info;

use super::anthropic::ANTHROPIC_MODELS;
use super::http_client::HttpClient;
use super::openai::OPENAI_MODELS;
use super::{AnthropicProvider, OpenAiProvider};
use crate::config::{ProviderSettings, ProvidersConfig};
use crate::domain::usage::{
    default_anthropic_pricing, default_openai_pricing, ModelPricing, PriceTable,
};
use crate::domain::{DomainError, FallbackOrchestrator, ProviderAdapter, ProviderConfig};
use crate::infrastructure::credentials::ApiKeySource;

/// Factory for creating provider adapters
#[derive(Debug)]
pub struct LlmProviderFactory;

impl LlmProviderFactory {
    /// Build every enabled provider that has an API key, in priority order.
    /// Ties keep the order below.
    pub fn from_config(
        config: &ProvidersConfig,
        keys: &dyn ApiKeySource,
    ) -> Vec<Arc<dyn ProviderAdapter>> {
        let mut adapters: Vec<(u32, Arc<dyn ProviderAdapter>)> = Vec::new();

        if let Some(provider_config) = Self::resolve(
            "OpenAI",
            &config.openai,
            keys,
            OPENAI_MODELS,
            default_openai_pricing(),
        ) {
            adapters.push((provider_config.priority, Self::create_openai(provider_config)));
        }

        if let Some(provider_config) = Self::resolve(
            "Anthropic",
            &config.anthropic,
            keys,
            ANTHROPIC_MODELS,
            default_anthropic_pricing(),
        ) {
            adapters.push((
                provider_config.priority,
                Self::create_anthropic(provider_config),
            ));
        }

        adapters.sort_by_key(|(priority, _)| *priority);
        adapters.into_iter().map(|(_, adapter)| adapter).collect()
    }

    /// Build the adapters and an orchestrator routing over them
    pub fn build_orchestrator(
        config: &ProvidersConfig,
        keys: &dyn ApiKeySource,
    ) -> Result<FallbackOrchestrator, DomainError> {
        FallbackOrchestrator::from_adapters(Self::from_config(config, keys))
    }

    pub fn create_openai(config: ProviderConfig) -> Arc<dyn ProviderAdapter> {
        Arc::new(OpenAiProvider::new(HttpClient::new(), config))
    }

    pub fn create_anthropic(config: ProviderConfig) -> Arc<dyn ProviderAdapter> {
        Arc::new(AnthropicProvider::new(HttpClient::new(), config))
    }

    fn resolve(
        name: &str,
        settings: &ProviderSettings,
        keys: &dyn ApiKeySource,
        default_models: &[&str],
        pricing: PriceTable,
    ) -> Option<ProviderConfig> {
        if !settings.enabled {
            info!(provider = name, "Provider disabled by configuration");
            return None;
        }

        let Some(api_key) = keys.api_key(&settings.api_key_env) else {
            info!(
                provider = name,
                env = %settings.api_key_env,
                "No API key configured, provider unavailable"
            );
            return None;
        };

        let models: Vec<String> = if settings.models.is_empty() {
            default_models.iter().map(|m| m.to_string()).collect()
        } else {
            settings.models.clone()
        };

        Some(
            ProviderConfig::new(api_key, settings.base_url.as_str())
                .with_models(models)
                .with_pricing(Self::price_table(name, settings, pricing))
                .with_priority(settings.priority)
                .with_timeout(settings.timeout()),
        )
    }

    /// Built-in prices with configured entries replacing them per model
    fn price_table(name: &str, settings: &ProviderSettings, mut table: PriceTable) -> PriceTable {
        for (model, price) in &settings.pricing {
            table.insert(ModelPricing::new(
                model.as_str(),
                name.to_lowercase(),
                price.input_per_1k,
                price.output_per_1k,
            ));
        }

        table
    }
}
