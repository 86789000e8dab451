//! Usage recording collaborator

use async_trait::async_trait;
use std::fmt::Debug;

use super::UsageRecord;
use crate::domain::DomainError;

/// Sink for usage records.
///
/// The dispatch core only computes usage; callers decide whether and where
/// to record it.
#[async_trait]
pub trait UsageRecorder: Send + Sync + Debug {
    async fn record(&self, record: UsageRecord) -> Result<(), DomainError>;
}
