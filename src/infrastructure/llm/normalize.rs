//! Shared call-and-normalize path for provider adapters

use std::time::{Duration, Instant};

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tracing::{debug, warn};

use super::http_client::HttpClientTrait;
use crate::domain::llm::{http_error_message, invalid_format_message};
use crate::domain::usage::{calculate_cost, PriceTable, TokenCounts};
use crate::domain::{FailureCategory, GenerateResponse};

/// What a provider's 2xx body turned out to contain
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ParseOutcome {
    Parsed {
        content: String,
        tokens: Option<TokenCounts>,
    },
    Malformed {
        reason: String,
    },
}

impl ParseOutcome {
    pub(crate) fn malformed(reason: impl Into<String>) -> Self {
        Self::Malformed {
            reason: reason.into(),
        }
    }
}

/// Distinguishes a missing field (`None`) from an explicit `null`
/// (`Some(None)`). Use with `#[serde(default)]`.
pub(crate) fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Turn a text field into response content. An explicit `null` becomes the
/// string `"null"`; a missing or empty field is malformed.
pub(crate) fn text_content(
    field: Option<Option<String>>,
    tokens: Option<TokenCounts>,
) -> ParseOutcome {
    match field {
        None => ParseOutcome::malformed("missing text field"),
        Some(None) => ParseOutcome::Parsed {
            content: "null".to_string(),
            tokens,
        },
        Some(Some(text)) if text.is_empty() => ParseOutcome::malformed("empty text field"),
        Some(Some(text)) => ParseOutcome::Parsed {
            content: text,
            tokens,
        },
    }
}

/// Read one count from a usage block. Anything other than a whole,
/// non-negative number counts as not reported.
pub(crate) fn token_count(usage: &Value, field: &str) -> Option<u64> {
    let value = usage.get(field)?;

    value.as_u64().or_else(|| {
        value
            .as_f64()
            .filter(|n| *n >= 0.0 && n.fract() == 0.0 && *n < u64::MAX as f64)
            .map(|n| n as u64)
    })
}

/// One outbound provider call
pub(crate) struct ProviderCall<'a> {
    pub provider: &'static str,
    pub model: &'a str,
    pub url: String,
    pub headers: Vec<(&'a str, &'a str)>,
    pub body: serde_json::Value,
    pub timeout: Duration,
    pub pricing: &'a PriceTable,
}

/// Perform the call and fold every outcome into a [`GenerateResponse`].
pub(crate) async fn execute<C, F>(client: &C, call: ProviderCall<'_>, parse: F) -> GenerateResponse
where
    C: HttpClientTrait + ?Sized,
    F: FnOnce(&str) -> ParseOutcome,
{
    let start = Instant::now();
    let provider = call.provider;

    debug!(provider, model = call.model, url = %call.url, "Sending provider request");

    let response = match client
        .post_json(&call.url, call.headers, &call.body, call.timeout)
        .await
    {
        Ok(response) => response,
        Err(e) => {
            warn!(provider, model = call.model, error = %e, "Provider transport failure");

            return GenerateResponse::failure(FailureCategory::Transport, e.to_string())
                .with_provider(provider)
                .with_processing_time(start.elapsed());
        }
    };

    if !response.is_success() {
        let category = FailureCategory::from_status(response.status);

        warn!(
            provider,
            model = call.model,
            status = response.status,
            category = %category,
            "Provider returned error status"
        );

        let message = http_error_message(
            provider,
            response.status,
            &response.status_text,
            &response.body,
        );

        return GenerateResponse::failure(category, message)
            .with_provider(provider)
            .with_processing_time(start.elapsed());
    }

    match parse(&response.body) {
        ParseOutcome::Parsed { content, tokens } => {
            let tokens_used = tokens.and_then(|t| t.tokens_used());
            let cost = tokens.and_then(|t| calculate_cost(call.pricing, call.model, &t));

            GenerateResponse::success(content)
                .with_usage(tokens_used, cost)
                .with_provider(provider)
                .with_processing_time(start.elapsed())
        }
        ParseOutcome::Malformed { reason } => {
            warn!(provider, model = call.model, reason = %reason, "Malformed provider response");

            GenerateResponse::failure(
                FailureCategory::MalformedResponse,
                invalid_format_message(provider),
            )
            .with_provider(provider)
            .with_processing_time(start.elapsed())
        }
    }
}
