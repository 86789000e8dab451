use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::FailureCategory;

/// Smallest processing time a response reports. A completed call always took
/// some time, even when the clock is too coarse to see it.
const MIN_PROCESSING_TIME: Duration = Duration::from_nanos(1);

/// Normalized outcome of a generation.
///
/// A successful response has non-empty `content` and no `error`; a failed one
/// has empty `content` and a non-empty `error`. `cost` is only set when
/// `tokens_used` is.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerateResponse {
    pub success: bool,
    /// Omitted from JSON on failure
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tokens_used: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost: Option<f64>,
    #[serde(rename = "processing_time_ms", with = "duration_ms")]
    pub processing_time: Duration,
    /// Adapter that produced this response
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_category: Option<FailureCategory>,
}

impl GenerateResponse {
    pub fn success(content: impl Into<String>) -> Self {
        Self {
            success: true,
            content: content.into(),
            error: None,
            tokens_used: None,
            cost: None,
            processing_time: MIN_PROCESSING_TIME,
            provider: None,
            error_category: None,
        }
    }

    pub fn failure(category: FailureCategory, error: impl Into<String>) -> Self {
        Self {
            success: false,
            content: String::new(),
            error: Some(error.into()),
            tokens_used: None,
            cost: None,
            processing_time: MIN_PROCESSING_TIME,
            provider: None,
            error_category: Some(category),
        }
    }

    /// Attach token usage. A cost without a token count is dropped.
    pub fn with_usage(mut self, tokens_used: Option<u64>, cost: Option<f64>) -> Self {
        self.tokens_used = tokens_used;
        self.cost = tokens_used.and(cost);
        self
    }

    pub fn with_processing_time(mut self, elapsed: Duration) -> Self {
        self.processing_time = elapsed.max(MIN_PROCESSING_TIME);
        self
    }

    pub fn with_provider(mut self, provider: impl Into<String>) -> Self {
        self.provider = Some(provider.into());
        self
    }

    pub fn is_success(&self) -> bool {
        self.success
    }

    pub fn content(&self) -> Option<&str> {
        if self.success {
            Some(&self.content)
        } else {
            None
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }
}

/// Serializes a duration as fractional milliseconds
mod duration_ms {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(value.as_secs_f64() * 1000.0)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let millis = f64::deserialize(deserializer)?;

        Duration::try_from_secs_f64(millis / 1000.0).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_shape() {
        let response = GenerateResponse::success("Hello").with_usage(Some(25), Some(0.0002));

        assert!(response.is_success());
        assert_eq!(response.content(), Some("Hello"));
        assert!(response.error().is_none());
        assert_eq!(response.tokens_used, Some(25));
        assert!(response.processing_time > Duration::ZERO);
    }

    #[test]
    fn test_failure_shape() {
        let response = GenerateResponse::failure(FailureCategory::Transport, "connection refused");

        assert!(!response.is_success());
        assert_eq!(response.content, "");
        assert_eq!(response.content(), None);
        assert_eq!(response.error(), Some("connection refused"));
        assert_eq!(response.error_category, Some(FailureCategory::Transport));

        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("content").is_none());
        assert_eq!(json["error_category"], "transport");
    }

    #[test]
    fn test_cost_requires_tokens() {
        let response = GenerateResponse::success("ok").with_usage(None, Some(1.5));

        assert!(response.tokens_used.is_none());
        assert!(response.cost.is_none());
    }

    #[test]
    fn test_zero_processing_time_is_clamped() {
        let response = GenerateResponse::success("ok").with_processing_time(Duration::ZERO);
        assert!(response.processing_time > Duration::ZERO);
    }

    #[test]
    fn test_serializes_processing_time_in_millis() {
        let response =
            GenerateResponse::success("ok").with_processing_time(Duration::from_millis(250));
        let json = serde_json::to_value(&response).unwrap();

        assert_eq!(json["processing_time_ms"], serde_json::json!(250.0));
        assert!(json.get("error").is_none());
        assert!(json.get("cost").is_none());
    }
}
