//! Provider fallback orchestration

mod orchestrator;

pub use orchestrator::{DispatchOutcome, DispatchResult, FallbackOrchestrator};
