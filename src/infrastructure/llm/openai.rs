use async_trait::async_trait;
use serde::Deserialize;

use super::http_client::HttpClientTrait;
use super::normalize::{self, present, text_content, token_count, ParseOutcome, ProviderCall};
use crate::domain::usage::TokenCounts;
use crate::domain::llm::REDACTED;
use crate::domain::{GenerateRequest, GenerateResponse, ProviderAdapter, ProviderConfig};

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com";
const PROVIDER_NAME: &str = "OpenAI";
const DEFAULT_MAX_TOKENS: u32 = 1000;
const DEFAULT_TEMPERATURE: f64 = 0.7;

/// Models served when configuration does not list any
pub const OPENAI_MODELS: &[&str] = &["gpt-4o", "gpt-4o-mini", "gpt-4-turbo", "gpt-3.5-turbo"];

/// Chat-completions API provider
pub struct OpenAiProvider<C: HttpClientTrait> {
    client: C,
    config: ProviderConfig,
    auth_header: String,
}

impl<C: HttpClientTrait> std::fmt::Debug for OpenAiProvider<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiProvider")
            .field("client", &self.client)
            .field("config", &self.config)
            .field("auth_header", &REDACTED)
            .finish()
    }
}

impl<C: HttpClientTrait> OpenAiProvider<C> {
    pub fn new(client: C, config: ProviderConfig) -> Self {
        let auth_header = format!("Bearer {}", config.api_key);

        Self {
            client,
            config,
            auth_header,
        }
    }

    fn chat_completions_url(&self) -> String {
        format!("{}/v1/chat/completions", self.config.base_url)
    }

    fn build_request(&self, request: &GenerateRequest) -> serde_json::Value {
        serde_json::json!({
            "model": request.model,
            "messages": [{"role": "user", "content": request.prompt}],
            "max_tokens": request.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            "temperature": request.temperature.unwrap_or(DEFAULT_TEMPERATURE),
        })
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        vec![
            ("Authorization", self.auth_header.as_str()),
            ("Content-Type", "application/json"),
        ]
    }
}

fn parse_response(body: &str) -> ParseOutcome {
    let response: ChatCompletionResponse = match serde_json::from_str(body) {
        Ok(response) => response,
        Err(e) => return ParseOutcome::malformed(e.to_string()),
    };

    let tokens = response.usage.as_ref().map(|usage| {
        TokenCounts::new(
            token_count(usage, "prompt_tokens"),
            token_count(usage, "completion_tokens"),
        )
        .with_total(token_count(usage, "total_tokens"))
    });

    match response.choices.into_iter().next() {
        Some(choice) => text_content(choice.message.content, tokens),
        None => ParseOutcome::malformed("no choices in response"),
    }
}

#[async_trait]
impl<C: HttpClientTrait> ProviderAdapter for OpenAiProvider<C> {
    async fn send(&self, request: &GenerateRequest) -> GenerateResponse {
        let call = ProviderCall {
            provider: PROVIDER_NAME,
            model: &request.model,
            url: self.chat_completions_url(),
            headers: self.headers(),
            body: self.build_request(request),
            timeout: self.config.timeout,
            pricing: &self.config.pricing,
        };

        normalize::execute(&self.client, call, parse_response).await
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER_NAME
    }

    fn supported_models(&self) -> Vec<String> {
        self.config.models.clone()
    }
}

// Chat-completions API types

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default, deserialize_with = "present")]
    content: Option<Option<String>>,
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::domain::usage::{ModelPricing, PriceTable};
    use crate::domain::FailureCategory;
    use crate::infrastructure::llm::http_client::mock::MockHttpClient;
    use crate::infrastructure::llm::http_client::HttpResponse;

    const TEST_URL: &str = "https://api.openai.com/v1/chat/completions";

    fn config() -> ProviderConfig {
        ProviderConfig::new("test-api-key", DEFAULT_OPENAI_BASE_URL)
            .with_models(["gpt-4o"])
            .with_pricing(
                PriceTable::new().with_price(ModelPricing::new("gpt-4o", "openai", 0.002, 0.002)),
            )
            .with_timeout(Duration::from_secs(7))
    }

    fn provider(client: MockHttpClient) -> OpenAiProvider<MockHttpClient> {
        OpenAiProvider::new(client, config())
    }

    #[test]
    fn test_debug_hides_api_key() {
        let debug = format!("{:?}", provider(MockHttpClient::new()));

        assert!(!debug.contains("test-api-key"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[tokio::test]
    async fn test_openai_chat() {
        let client = MockHttpClient::new().with_json(
            TEST_URL,
            serde_json::json!({
                "id": "chatcmpl-123",
                "choices": [{"index": 0, "message": {"role": "assistant", "content": "Hello there"}}],
                "usage": {"prompt_tokens": 9, "completion_tokens": 12, "total_tokens": 21}
            }),
        );
        let provider = provider(client);

        let response = provider.send(&GenerateRequest::new("gpt-4o", "Hi")).await;

        assert!(response.success);
        assert_eq!(response.content(), Some("Hello there"));
        assert_eq!(response.tokens_used, Some(21));
        // 9 * 0.002 / 1000 + 12 * 0.002 / 1000
        assert!((response.cost.unwrap() - 0.000042).abs() < 1e-12);
        assert_eq!(response.provider.as_deref(), Some("OpenAI"));
        assert!(response.processing_time > Duration::ZERO);
    }

    #[tokio::test]
    async fn test_openai_wire_format() {
        let client = MockHttpClient::new().with_json(
            TEST_URL,
            serde_json::json!({"choices": [{"message": {"content": "ok"}}]}),
        );
        let provider = provider(client);

        let request = GenerateRequest::builder()
            .model("gpt-4o")
            .prompt("Summarize")
            .max_tokens(64)
            .temperature(0.2)
            .build();
        provider.send(&request).await;

        let sent = &provider.client.requests()[0];
        assert_eq!(sent.url, TEST_URL);
        assert_eq!(sent.header("Authorization"), Some("Bearer test-api-key"));
        assert_eq!(sent.timeout, Duration::from_secs(7));
        assert_eq!(
            sent.body,
            serde_json::json!({
                "model": "gpt-4o",
                "messages": [{"role": "user", "content": "Summarize"}],
                "max_tokens": 64,
                "temperature": 0.2
            })
        );
    }

    #[tokio::test]
    async fn test_openai_default_generation_params() {
        let client = MockHttpClient::new().with_json(
            TEST_URL,
            serde_json::json!({"choices": [{"message": {"content": "ok"}}]}),
        );
        let provider = provider(client);

        provider.send(&GenerateRequest::new("gpt-4o", "Hi")).await;

        let sent = &provider.client.requests()[0];
        assert_eq!(sent.body["max_tokens"], serde_json::json!(1000));
        assert_eq!(sent.body["temperature"], serde_json::json!(0.7));
    }

    #[tokio::test]
    async fn test_openai_null_content_is_literal_null() {
        let client = MockHttpClient::new().with_json(
            TEST_URL,
            serde_json::json!({"choices": [{"message": {"content": null}}]}),
        );
        let response = provider(client)
            .send(&GenerateRequest::new("gpt-4o", "Hi"))
            .await;

        assert!(response.success);
        assert_eq!(response.content, "null");
    }

    #[tokio::test]
    async fn test_openai_malformed_bodies() {
        let bodies = [
            "not json at all".to_string(),
            serde_json::json!({"id": "x"}).to_string(),
            serde_json::json!({"choices": []}).to_string(),
            serde_json::json!({"choices": [{"message": {}}]}).to_string(),
            serde_json::json!({"choices": [{}]}).to_string(),
        ];

        for body in bodies {
            let client = MockHttpClient::new()
                .with_response(TEST_URL, HttpResponse::new(200, "OK", body.clone()));
            let response = provider(client)
                .send(&GenerateRequest::new("gpt-4o", "Hi"))
                .await;

            assert!(!response.success, "body should be malformed: {}", body);
            assert_eq!(
                response.error(),
                Some("Invalid response format from OpenAI API")
            );
            assert_eq!(
                response.error_category,
                Some(FailureCategory::MalformedResponse)
            );
        }
    }

    #[tokio::test]
    async fn test_openai_error_status() {
        let client = MockHttpClient::new().with_response(
            TEST_URL,
            HttpResponse::new(429, "Too Many Requests", r#"{"error":"slow down"}"#),
        );
        let response = provider(client)
            .send(&GenerateRequest::new("gpt-4o", "Hi"))
            .await;

        assert!(!response.success);
        assert_eq!(response.content, "");
        assert_eq!(
            response.error(),
            Some(r#"OpenAI API error: 429 Too Many Requests - {"error":"slow down"}"#)
        );
        assert_eq!(response.error_category, Some(FailureCategory::RateLimit));
        assert!(response.processing_time > Duration::ZERO);
    }

    #[tokio::test]
    async fn test_openai_transport_error_is_unwrapped() {
        let client =
            MockHttpClient::new().with_transport_error(TEST_URL, "dns error: failed to lookup");
        let response = provider(client)
            .send(&GenerateRequest::new("gpt-4o", "Hi"))
            .await;

        assert!(!response.success);
        assert_eq!(response.error(), Some("dns error: failed to lookup"));
        assert_eq!(response.error_category, Some(FailureCategory::Transport));
    }

    #[tokio::test]
    async fn test_openai_without_usage() {
        let client = MockHttpClient::new().with_json(
            TEST_URL,
            serde_json::json!({"choices": [{"message": {"content": "hi"}}]}),
        );
        let response = provider(client)
            .send(&GenerateRequest::new("gpt-4o", "Hi"))
            .await;

        assert!(response.success);
        assert!(response.tokens_used.is_none());
        assert!(response.cost.is_none());
    }

    #[tokio::test]
    async fn test_openai_odd_usage_keeps_content() {
        let client = MockHttpClient::new().with_json(
            TEST_URL,
            serde_json::json!({
                "choices": [{"message": {"content": "hi"}}],
                "usage": {"prompt_tokens": "10", "completion_tokens": -3, "total_tokens": 500.0}
            }),
        );
        let response = provider(client)
            .send(&GenerateRequest::new("gpt-4o", "Hi"))
            .await;

        assert!(response.success);
        assert_eq!(response.content(), Some("hi"));
        assert_eq!(response.tokens_used, Some(500));
        assert!((response.cost.unwrap() - 0.001).abs() < 1e-12);
    }

    #[tokio::test]
    async fn test_openai_non_object_usage_keeps_content() {
        let client = MockHttpClient::new().with_json(
            TEST_URL,
            serde_json::json!({
                "choices": [{"message": {"content": "hi"}}],
                "usage": "n/a"
            }),
        );
        let response = provider(client)
            .send(&GenerateRequest::new("gpt-4o", "Hi"))
            .await;

        assert!(response.success);
        assert!(response.tokens_used.is_none());
        assert!(response.cost.is_none());
    }

    #[tokio::test]
    async fn test_openai_total_only_usage() {
        let client = MockHttpClient::new().with_json(
            TEST_URL,
            serde_json::json!({
                "choices": [{"message": {"content": "hi"}}],
                "usage": {"total_tokens": 500}
            }),
        );
        let response = provider(client)
            .send(&GenerateRequest::new("gpt-4o", "Hi"))
            .await;

        assert_eq!(response.tokens_used, Some(500));
        assert!((response.cost.unwrap() - 0.001).abs() < 1e-12);
    }

    #[tokio::test]
    async fn test_openai_unpriced_model_has_tokens_without_cost() {
        let client = MockHttpClient::new().with_json(
            TEST_URL,
            serde_json::json!({
                "choices": [{"message": {"content": "hi"}}],
                "usage": {"total_tokens": 500}
            }),
        );
        let response = provider(client)
            .send(&GenerateRequest::new("gpt-unpriced", "Hi"))
            .await;

        assert_eq!(response.tokens_used, Some(500));
        assert!(response.cost.is_none());
    }

    #[tokio::test]
    async fn test_openai_custom_base_url() {
        let custom_url = "http://localhost:8080/v1/chat/completions";
        let client = MockHttpClient::new().with_json(
            custom_url,
            serde_json::json!({"choices": [{"message": {"content": "custom"}}]}),
        );
        let provider = OpenAiProvider::new(
            client,
            ProviderConfig::new("test-key", "http://localhost:8080/"),
        );

        let response = provider.send(&GenerateRequest::new("gpt-4o", "Hi")).await;

        assert_eq!(response.content(), Some("custom"));
    }
}
