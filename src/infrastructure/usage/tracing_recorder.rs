use async_trait::async_trait;
use tracing::{info, warn};

use crate::domain::usage::{UsageRecord, UsageRecorder};
use crate::domain::DomainError;

/// Emits each usage record as a structured log event
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingUsageRecorder;

impl TracingUsageRecorder {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl UsageRecorder for TracingUsageRecorder {
    async fn record(&self, record: UsageRecord) -> Result<(), DomainError> {
        if record.success {
            info!(
                usage_id = %record.id(),
                provider = record.provider.as_deref().unwrap_or("none"),
                model = %record.model,
                tokens_used = record.tokens_used,
                cost = record.cost,
                processing_time_ms = record.processing_time_ms,
                "Usage recorded"
            );
        } else {
            warn!(
                usage_id = %record.id(),
                model = %record.model,
                processing_time_ms = record.processing_time_ms,
                error = record.error.as_deref().unwrap_or(""),
                "Failed request recorded"
            );
        }

        Ok(())
    }
}
