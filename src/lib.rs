//! ai-dispatch
//!
//! Multi-provider text generation with ordered fallback:
//! - Normalized request/response model shared by every provider
//! - OpenAI and Anthropic adapters with failure classification
//! - Model compatibility registry deciding which providers may serve a model
//! - Token-based cost accounting and pluggable usage recording

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;
pub use domain::{
    DispatchOutcome, DispatchResult, DomainError, FailureCategory, FallbackOrchestrator,
    GenerateRequest, GenerateResponse, ModelCompatibilityRegistry, ProviderAdapter,
};
pub use infrastructure::llm::LlmProviderFactory;
