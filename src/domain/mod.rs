//! Domain layer - request/response model, routing and cost accounting

pub mod error;
pub mod fallback;
pub mod llm;
pub mod usage;

pub use error::DomainError;
pub use fallback::{DispatchOutcome, DispatchResult, FallbackOrchestrator};
pub use llm::{
    FailureCategory, FailureRecord, GenerateRequest, GenerateRequestBuilder, GenerateResponse,
    ModelCompatibilityRegistry, ProviderAdapter, ProviderConfig,
};
pub use usage::{ModelPricing, PriceTable, TokenCounts, UsageRecord, UsageRecorder};
