//! Model compatibility registry
//!
//! Maps a model identifier to the providers that can serve it, in the order
//! the providers were registered. Registration order is priority order.

use std::collections::BTreeMap;
use std::sync::Arc;

use super::ProviderAdapter;

#[derive(Debug, Clone, Default)]
pub struct ModelCompatibilityRegistry {
    models: BTreeMap<String, Vec<String>>,
    providers: Vec<String>,
}

impl ModelCompatibilityRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from adapters already sorted by priority.
    pub fn from_adapters(adapters: &[Arc<dyn ProviderAdapter>]) -> Self {
        adapters.iter().fold(Self::new(), |registry, adapter| {
            registry.with_provider(adapter.provider_name(), adapter.supported_models())
        })
    }

    pub fn with_provider<I, S>(mut self, provider: impl Into<String>, models: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.register(provider, models);
        self
    }

    /// Register a provider for a set of models. Re-registering a provider for
    /// a model it already serves keeps its original position.
    pub fn register<I, S>(&mut self, provider: impl Into<String>, models: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let provider = provider.into();

        if !self.providers.contains(&provider) {
            self.providers.push(provider.clone());
        }

        for model in models {
            let eligible = self.models.entry(model.into()).or_default();

            if !eligible.contains(&provider) {
                eligible.push(provider.clone());
            }
        }
    }

    /// Providers eligible for `model`, in priority order. Unknown models get
    /// an empty slice.
    pub fn eligible_providers(&self, model: &str) -> &[String] {
        self.models.get(model).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_supported(&self, model: &str) -> bool {
        !self.eligible_providers(model).is_empty()
    }

    /// Every registered provider name, in registration order
    pub fn providers(&self) -> &[String] {
        &self.providers
    }

    /// Every model with its eligible providers, ordered by model id
    pub fn models(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.models
            .iter()
            .map(|(model, providers)| (model.as_str(), providers.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}
