//! Model pricing and cost calculation

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Token counts reported by a provider. Any of them may be missing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenCounts {
    pub input: Option<u64>,
    pub output: Option<u64>,
    /// Provider-reported total, when it sends one
    pub total: Option<u64>,
}

impl TokenCounts {
    pub fn new(input: Option<u64>, output: Option<u64>) -> Self {
        Self {
            input,
            output,
            total: None,
        }
    }

    pub fn with_total(mut self, total: Option<u64>) -> Self {
        self.total = total;
        self
    }

    /// Tokens consumed by the call: the reported total if present, otherwise
    /// the sum of whichever sub-counts exist.
    pub fn tokens_used(&self) -> Option<u64> {
        if self.total.is_some() {
            return self.total;
        }

        match (self.input, self.output) {
            (None, None) => None,
            (input, output) => Some(input.unwrap_or(0).saturating_add(output.unwrap_or(0))),
        }
    }

    fn has_split(&self) -> bool {
        self.input.is_some() || self.output.is_some()
    }
}

/// Pricing for one model, in USD per 1K tokens
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelPricing {
    pub model_id: String,
    pub provider: String,
    pub input_price_per_1k: f64,
    pub output_price_per_1k: f64,
}

impl ModelPricing {
    pub fn new(
        model_id: impl Into<String>,
        provider: impl Into<String>,
        input_per_1k: f64,
        output_per_1k: f64,
    ) -> Self {
        Self {
            model_id: model_id.into(),
            provider: provider.into(),
            input_price_per_1k: input_per_1k,
            output_price_per_1k: output_per_1k,
        }
    }

    /// Cost in USD for the given counts.
    ///
    /// Input and output are billed at their own rates, missing sub-counts as
    /// zero. When only a total is known it is billed at the mean of the two
    /// rates. No counts at all yields `None`.
    pub fn calculate_cost(&self, tokens: &TokenCounts) -> Option<f64> {
        if tokens.has_split() {
            let input = tokens.input.unwrap_or(0) as f64;
            let output = tokens.output.unwrap_or(0) as f64;

            return Some(
                input * self.input_price_per_1k / 1000.0
                    + output * self.output_price_per_1k / 1000.0,
            );
        }

        let total = tokens.total? as f64;
        let blended = (self.input_price_per_1k + self.output_price_per_1k) / 2.0;

        Some(total * blended / 1000.0)
    }
}

/// One provider's prices, keyed by model id
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceTable {
    prices: HashMap<String, ModelPricing>,
}

impl PriceTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_price(mut self, pricing: ModelPricing) -> Self {
        self.insert(pricing);
        self
    }

    pub fn insert(&mut self, pricing: ModelPricing) {
        self.prices.insert(pricing.model_id.clone(), pricing);
    }

    pub fn get(&self, model: &str) -> Option<&ModelPricing> {
        self.prices.get(model)
    }

    pub fn len(&self) -> usize {
        self.prices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prices.is_empty()
    }
}

/// Cost of a call, or `None` when the model has no price or no counts exist.
pub fn calculate_cost(table: &PriceTable, model: &str, tokens: &TokenCounts) -> Option<f64> {
    table.get(model)?.calculate_cost(tokens)
}

/// Built-in prices for the chat-completions provider
pub fn default_openai_pricing() -> PriceTable {
    PriceTable::new()
        .with_price(ModelPricing::new("gpt-4o", "openai", 0.0025, 0.01))
        .with_price(ModelPricing::new("gpt-4o-mini", "openai", 0.00015, 0.0006))
        .with_price(ModelPricing::new("gpt-4-turbo", "openai", 0.01, 0.03))
        .with_price(ModelPricing::new("gpt-3.5-turbo", "openai", 0.0005, 0.0015))
}

/// Built-in prices for the messages provider
pub fn default_anthropic_pricing() -> PriceTable {
    PriceTable::new()
        .with_price(ModelPricing::new(
            "claude-3-5-sonnet-20241022",
            "anthropic",
            0.003,
            0.015,
        ))
        .with_price(ModelPricing::new(
            "claude-3-5-haiku-20241022",
            "anthropic",
            0.0008,
            0.004,
        ))
        .with_price(ModelPricing::new(
            "claude-3-opus-20240229",
            "anthropic",
            0.015,
            0.075,
        ))
        .with_price(ModelPricing::new(
            "claude-3-haiku-20240307",
            "anthropic",
            0.00025,
            0.00125,
        ))
}
