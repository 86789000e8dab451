//! Failure classification for provider calls
//!
//! Categories are advisory metadata. They ride alongside the error message
//! and never change its text.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Category of a failed generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureCategory {
    /// 401/403 from the provider
    Authentication,
    /// 429 from the provider
    RateLimit,
    /// 5xx from the provider
    ServerError,
    /// Any other 4xx from the provider
    BadRequest,
    /// 2xx with a body we could not read a result from
    MalformedResponse,
    /// The request never produced an HTTP response (timeout, DNS, refused, TLS)
    Transport,
    /// The registry lists no provider for the requested model
    NoEligibleProvider,
    /// Every eligible provider was tried and failed
    AllProvidersFailed,
}

impl FailureCategory {
    /// Classify a non-success HTTP status.
    pub fn from_status(status: u16) -> Self {
        match status {
            401 | 403 => Self::Authentication,
            429 => Self::RateLimit,
            400..=499 => Self::BadRequest,
            // 5xx, plus anything non-2xx that escaped redirect handling
            _ => Self::ServerError,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Authentication => "authentication",
            Self::RateLimit => "rate_limit",
            Self::ServerError => "server_error",
            Self::BadRequest => "bad_request",
            Self::MalformedResponse => "malformed_response",
            Self::Transport => "transport",
            Self::NoEligibleProvider => "no_eligible_provider",
            Self::AllProvidersFailed => "all_providers_failed",
        }
    }
}

impl fmt::Display for FailureCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One failed attempt within a fallback pass
#[derive(Debug, Clone, PartialEq)]
pub struct FailureRecord {
    pub provider: String,
    pub category: FailureCategory,
    pub message: String,
}

impl FailureRecord {
    pub fn new(
        provider: impl Into<String>,
        category: FailureCategory,
        message: impl Into<String>,
    ) -> Self {
        Self {
            provider: provider.into(),
            category,
            message: message.into(),
        }
    }
}

/// `"<Provider> API error: <status> <statusText> - <body>"`. The body is kept whole.
pub fn http_error_message(provider: &str, status: u16, status_text: &str, body: &str) -> String {
    format!("{} API error: {} {} - {}", provider, status, status_text, body)
}

pub fn invalid_format_message(provider: &str) -> String {
    format!("Invalid response format from {} API", provider)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_auth_statuses() {
        assert_eq!(FailureCategory::from_status(401), FailureCategory::Authentication);
        assert_eq!(FailureCategory::from_status(403), FailureCategory::Authentication);
    }

    #[test]
    fn test_classify_rate_limit() {
        assert_eq!(FailureCategory::from_status(429), FailureCategory::RateLimit);
    }

    #[test]
    fn test_classify_other_client_errors() {
        assert_eq!(FailureCategory::from_status(400), FailureCategory::BadRequest);
        assert_eq!(FailureCategory::from_status(404), FailureCategory::BadRequest);
        assert_eq!(FailureCategory::from_status(422), FailureCategory::BadRequest);
    }

    #[test]
    fn test_classify_server_errors() {
        assert_eq!(FailureCategory::from_status(500), FailureCategory::ServerError);
        assert_eq!(FailureCategory::from_status(503), FailureCategory::ServerError);
        assert_eq!(FailureCategory::from_status(599), FailureCategory::ServerError);
    }

    #[test]
    fn test_http_error_message_format() {
        let message = http_error_message("OpenAI", 500, "Internal Server Error", "{\"oops\":1}");
        assert_eq!(
            message,
            "OpenAI API error: 500 Internal Server Error - {\"oops\":1}"
        );
    }

    #[test]
    fn test_http_error_message_with_empty_status_text() {
        assert_eq!(
            http_error_message("OpenAI", 599, "", "odd gateway"),
            "OpenAI API error: 599  - odd gateway"
        );
        assert_eq!(FailureCategory::from_status(599), FailureCategory::ServerError);
    }

    #[test]
    fn test_http_error_message_keeps_large_body() {
        let body = "x".repeat(100_000);
        let message = http_error_message("Anthropic", 400, "Bad Request", &body);

        assert!(message.ends_with(&body));
        assert_eq!(message.len(), "Anthropic API error: 400 Bad Request - ".len() + 100_000);
    }

    #[test]
    fn test_invalid_format_message() {
        assert_eq!(
            invalid_format_message("Anthropic"),
            "Invalid response format from Anthropic API"
        );
    }

    #[test]
    fn test_category_serializes_snake_case() {
        let json = serde_json::to_string(&FailureCategory::NoEligibleProvider).unwrap();
        assert_eq!(json, "\"no_eligible_provider\"");
        assert_eq!(FailureCategory::RateLimit.to_string(), "rate_limit");
    }
}
