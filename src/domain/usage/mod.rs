//! Usage and cost domain
//!
//! Token accounting, per-model pricing and the record handed to a usage
//! recorder after a dispatch.

mod pricing;
mod record;
mod recorder;

pub use pricing::{
    calculate_cost, default_anthropic_pricing, default_openai_pricing, ModelPricing, PriceTable,
    TokenCounts,
};
pub use record::{UsageRecord, UsageRecordId};
pub use recorder::UsageRecorder;
