//! Fallback orchestrator - tries eligible providers in priority order

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use tracing::{error, info, warn};

use crate::domain::llm::{
    FailureCategory, FailureRecord, GenerateRequest, GenerateResponse,
    ModelCompatibilityRegistry, ProviderAdapter,
};
use crate::domain::DomainError;

/// How a dispatch ended
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    /// A provider answered; no later provider was contacted
    Succeeded { provider: String },
    /// The registry had no provider for the model; nothing was called
    NoEligibleProvider,
    /// Every eligible provider was called and failed
    AllProvidersFailed { last_failure: FailureCategory },
}

/// Result of one dispatch pass
#[derive(Debug, Clone)]
pub struct DispatchResult {
    pub response: GenerateResponse,
    pub outcome: DispatchOutcome,
    /// Number of adapter calls made
    pub attempts: u32,
}

impl DispatchResult {
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, DispatchOutcome::Succeeded { .. })
    }
}

/// Sends a request to the first eligible provider that succeeds.
///
/// Providers are called one at a time, in registry order, each at most once
/// per dispatch. Failure records live only for the duration of a call.
pub struct FallbackOrchestrator {
    registry: ModelCompatibilityRegistry,
    adapters: HashMap<String, Arc<dyn ProviderAdapter>>,
}

impl std::fmt::Debug for FallbackOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FallbackOrchestrator")
            .field("registry", &self.registry)
            .field("providers", &self.registry.providers())
            .finish()
    }
}

impl FallbackOrchestrator {
    /// Create an orchestrator. Every provider the registry names must have
    /// exactly one adapter.
    pub fn new(
        registry: ModelCompatibilityRegistry,
        adapters: Vec<Arc<dyn ProviderAdapter>>,
    ) -> Result<Self, DomainError> {
        let mut by_name: HashMap<String, Arc<dyn ProviderAdapter>> = HashMap::new();

        for adapter in adapters {
            let name = adapter.provider_name().to_string();

            if by_name.insert(name.clone(), adapter).is_some() {
                return Err(DomainError::configuration(format!(
                    "Duplicate adapter for provider '{}'",
                    name
                )));
            }
        }

        if let Some(missing) = registry
            .providers()
            .iter()
            .find(|name| !by_name.contains_key(name.as_str()))
        {
            return Err(DomainError::configuration(format!(
                "No adapter registered for provider '{}'",
                missing
            )));
        }

        Ok(Self {
            registry,
            adapters: by_name,
        })
    }

    /// Build the registry from the adapters themselves. `adapters` must
    /// already be in priority order.
    pub fn from_adapters(adapters: Vec<Arc<dyn ProviderAdapter>>) -> Result<Self, DomainError> {
        let registry = ModelCompatibilityRegistry::from_adapters(&adapters);
        Self::new(registry, adapters)
    }

    pub fn registry(&self) -> &ModelCompatibilityRegistry {
        &self.registry
    }

    /// Dispatch and keep only the response
    pub async fn generate(&self, request: &GenerateRequest) -> GenerateResponse {
        self.dispatch(request).await.response
    }

    /// Dispatch a request through the fallback chain for its model
    pub async fn dispatch(&self, request: &GenerateRequest) -> DispatchResult {
        let start = Instant::now();
        let eligible = self.registry.eligible_providers(&request.model);

        if eligible.is_empty() {
            warn!(model = %request.model, "No eligible provider for model");

            let response = GenerateResponse::failure(
                FailureCategory::NoEligibleProvider,
                format!("No AI provider available for model: {}", request.model),
            )
            .with_processing_time(start.elapsed());

            return DispatchResult {
                response,
                outcome: DispatchOutcome::NoEligibleProvider,
                attempts: 0,
            };
        }

        let mut failures: Vec<FailureRecord> = Vec::with_capacity(eligible.len());
        let mut attempts = 0u32;

        for provider in eligible {
            // `new` guarantees every registry name resolves
            let Some(adapter) = self.adapters.get(provider) else {
                continue;
            };

            attempts += 1;
            let response = adapter.send(request).await;

            if response.success {
                info!(
                    model = %request.model,
                    provider = %provider,
                    attempts,
                    tokens_used = response.tokens_used,
                    "Generation succeeded"
                );

                return DispatchResult {
                    response,
                    outcome: DispatchOutcome::Succeeded {
                        provider: provider.clone(),
                    },
                    attempts,
                };
            }

            let failure = FailureRecord::new(
                provider.as_str(),
                response
                    .error_category
                    .unwrap_or(FailureCategory::ServerError),
                response.error.unwrap_or_default(),
            );

            warn!(
                model = %request.model,
                provider = %failure.provider,
                category = %failure.category,
                error = %failure.message,
                "Provider failed, falling back"
            );

            failures.push(failure);
        }

        let (last_message, last_failure) = failures
            .last()
            .map(|f| (f.message.as_str(), f.category))
            .unwrap_or(("", FailureCategory::NoEligibleProvider));

        error!(
            model = %request.model,
            attempts,
            "All eligible providers failed"
        );

        let response = GenerateResponse::failure(
            FailureCategory::AllProvidersFailed,
            format!("All AI providers failed. Last error: {}", last_message),
        )
        .with_processing_time(start.elapsed());

        DispatchResult {
            response,
            outcome: DispatchOutcome::AllProvidersFailed { last_failure },
            attempts,
        }
    }
}
