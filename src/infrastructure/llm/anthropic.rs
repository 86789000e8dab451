use async_trait::async_trait;
use serde::Deserialize;

use super::http_client::HttpClientTrait;
use super::normalize::{self, present, text_content, token_count, ParseOutcome, ProviderCall};
use crate::domain::usage::TokenCounts;
use crate::domain::{GenerateRequest, GenerateResponse, ProviderAdapter, ProviderConfig};

pub const DEFAULT_ANTHROPIC_BASE_URL: &str = "https://api.anthropic.com";
const ANTHROPIC_VERSION: &str = "2023-06-01";
const PROVIDER_NAME: &str = "Anthropic";
const DEFAULT_MAX_TOKENS: u32 = 1000;

/// Models served when configuration does not list any
pub const ANTHROPIC_MODELS: &[&str] = &[
    "claude-3-5-sonnet-20241022",
    "claude-3-5-haiku-20241022",
    "claude-3-opus-20240229",
    "claude-3-haiku-20240307",
];

/// Messages API provider
#[derive(Debug)]
pub struct AnthropicProvider<C: HttpClientTrait> {
    client: C,
    config: ProviderConfig,
}

impl<C: HttpClientTrait> AnthropicProvider<C> {
    pub fn new(client: C, config: ProviderConfig) -> Self {
        Self { client, config }
    }

    fn messages_url(&self) -> String {
        format!("{}/v1/messages", self.config.base_url)
    }

    /// The messages payload carries no temperature.
    fn build_request(&self, request: &GenerateRequest) -> serde_json::Value {
        serde_json::json!({
            "model": request.model,
            "max_tokens": request.max_tokens.unwrap_or(DEFAULT_MAX_TOKENS),
            "messages": [{"role": "user", "content": request.prompt}],
        })
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        vec![
            ("x-api-key", self.config.api_key.as_str()),
            ("anthropic-version", ANTHROPIC_VERSION),
            ("Content-Type", "application/json"),
        ]
    }
}

fn parse_response(body: &str) -> ParseOutcome {
    let response: MessagesResponse = match serde_json::from_str(body) {
        Ok(response) => response,
        Err(e) => return ParseOutcome::malformed(e.to_string()),
    };

    let tokens = response.usage.as_ref().map(|usage| {
        TokenCounts::new(
            token_count(usage, "input_tokens"),
            token_count(usage, "output_tokens"),
        )
    });

    match response.content.into_iter().next() {
        Some(block) => text_content(block.text, tokens),
        None => ParseOutcome::malformed("empty content array"),
    }
}

#[async_trait]
impl<C: HttpClientTrait> ProviderAdapter for AnthropicProvider<C> {
    async fn send(&self, request: &GenerateRequest) -> GenerateResponse {
        let call = ProviderCall {
            provider: PROVIDER_NAME,
            model: &request.model,
            url: self.messages_url(),
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

// Messages API types

#[derive(Debug, Deserialize)]
struct MessagesResponse {
    content: Vec<ContentBlock>,
    #[serde(default)]
    usage: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(default, deserialize_with = "present")]
    text: Option<Option<String>>,
}
