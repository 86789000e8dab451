//! In-memory usage recorder

use std::collections::VecDeque;
use std::sync::RwLock;

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::usage::{UsageRecord, UsageRecorder};
use crate::domain::DomainError;

const DEFAULT_MAX_RECORDS: usize = 100_000;

/// Running totals across the retained records
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UsageTotals {
    pub requests: u64,
    pub successes: u64,
    pub failures: u64,
    pub tokens_used: u64,
    /// Cost in USD
    pub cost: f64,
}

impl UsageTotals {
    fn add_record(&mut self, record: &UsageRecord) {
        self.requests += 1;
        if record.success {
            self.successes += 1;
        } else {
            self.failures += 1;
        }
        self.tokens_used = self
            .tokens_used
            .saturating_add(record.tokens_used.unwrap_or(0));
        self.cost += record.cost.unwrap_or(0.0);
    }
}

/// Bounded recorder keeping the most recent records in arrival order
#[derive(Debug)]
pub struct InMemoryUsageRecorder {
    records: RwLock<VecDeque<UsageRecord>>,
    max_records: usize,
}

impl InMemoryUsageRecorder {
    pub fn new(max_records: usize) -> Self {
        Self {
            records: RwLock::new(VecDeque::new()),
            max_records: max_records.max(1),
        }
    }

    /// Snapshot of the retained records, oldest first
    pub fn records(&self) -> Result<Vec<UsageRecord>, DomainError> {
        let records = self.records.read().map_err(|e| {
            DomainError::internal(format!("Failed to acquire read lock: {}", e))
        })?;

        Ok(records.iter().cloned().collect())
    }

    pub fn totals(&self) -> Result<UsageTotals, DomainError> {
        let records = self.records.read().map_err(|e| {
            DomainError::internal(format!("Failed to acquire read lock: {}", e))
        })?;

        let mut totals = UsageTotals::default();
        for record in records.iter() {
            totals.add_record(record);
        }

        Ok(totals)
    }
}

impl Default for InMemoryUsageRecorder {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_RECORDS)
    }
}

#[async_trait]
impl UsageRecorder for InMemoryUsageRecorder {
    async fn record(&self, record: UsageRecord) -> Result<(), DomainError> {
        let mut records = self.records.write().map_err(|e| {
            DomainError::internal(format!("Failed to acquire write lock: {}", e))
        })?;

        records.push_back(record);
        while records.len() > self.max_records {
            records.pop_front();
        }

        Ok(())
    }
}
