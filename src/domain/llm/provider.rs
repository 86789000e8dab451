use std::fmt::{self, Debug};
use std::time::Duration;

use async_trait::async_trait;

use super::{GenerateRequest, GenerateResponse};
use crate::domain::usage::PriceTable;

/// One external completion API behind a uniform call.
///
/// `send` never fails: transport errors, non-2xx statuses and unreadable
/// bodies all come back as a failed [`GenerateResponse`] with a category.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProviderAdapter: Send + Sync + Debug {
    /// Send a generation request to the provider
    async fn send(&self, request: &GenerateRequest) -> GenerateResponse;

    /// Name used in error messages and registry entries
    fn provider_name(&self) -> &'static str;

    /// Model identifiers this provider serves
    fn supported_models(&self) -> Vec<String>;
}

/// Stands in for secrets in `Debug` output
pub const REDACTED: &str = "[REDACTED]";

/// Immutable per-provider settings, resolved once at startup
#[derive(Clone)]
pub struct ProviderConfig {
    pub api_key: String,
    pub base_url: String,
    pub models: Vec<String>,
    pub pricing: PriceTable,
    /// Lower runs first
    pub priority: u32,
    pub timeout: Duration,
}

impl Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &REDACTED)
            .field("base_url", &self.base_url)
            .field("models", &self.models)
            .field("pricing", &self.pricing)
            .field("priority", &self.priority)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl ProviderConfig {
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            models: Vec::new(),
            pricing: PriceTable::default(),
            priority: 0,
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_models<I, S>(mut self, models: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.models = models.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_pricing(mut self, pricing: PriceTable) -> Self {
        self.pricing = pricing;
        self
    }

    pub fn with_priority(mut self, priority: u32) -> Self {
        self.priority = priority;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}
