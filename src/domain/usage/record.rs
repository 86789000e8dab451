//! Usage record handed to the usage-recording collaborator

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::domain::llm::{GenerateRequest, GenerateResponse};

/// Unique identifier for a usage record
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UsageRecordId(String);

impl UsageRecordId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn generate() -> Self {
        Self(format!("usage-{}", Uuid::new_v4()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UsageRecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Usage and cost of one dispatched request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UsageRecord {
    id: UsageRecordId,
    /// Provider that answered, if any got that far
    pub provider: Option<String>,
    pub model: String,
    pub tokens_used: Option<u64>,
    /// Cost in USD
    pub cost: Option<f64>,
    pub processing_time_ms: u64,
    pub success: bool,
    pub error: Option<String>,
    pub recorded_at: DateTime<Utc>,
    /// Caller metadata copied from the request
    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl UsageRecord {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            id: UsageRecordId::generate(),
            provider: None,
            model: model.into(),
            tokens_used: None,
            cost: None,
            processing_time_ms: 0,
            success: true,
            error: None,
            recorded_at: Utc::now(),
            metadata: Map::new(),
        }
    }

    /// Build a record from a request and the response it produced
    pub fn from_dispatch(request: &GenerateRequest, response: &GenerateResponse) -> Self {
        let mut record = Self::new(&request.model);

        record.provider = response.provider.clone();
        record.tokens_used = response.tokens_used;
        record.cost = response.cost;
        record.processing_time_ms =
            u64::try_from(response.processing_time.as_millis()).unwrap_or(u64::MAX);
        record.success = response.success;
        record.error = response.error.clone();
        record.metadata = request.metadata.clone();
        record
    }

    pub fn id(&self) -> &UsageRecordId {
        &self.id
    }
}
