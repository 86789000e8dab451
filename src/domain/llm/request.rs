use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single logical "generate text" request.
///
/// `metadata` belongs to the caller and is carried through untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    pub prompt: String,
    pub model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub metadata: Map<String, Value>,
}

impl GenerateRequest {
    pub fn new(model: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            model: model.into(),
            max_tokens: None,
            temperature: None,
            metadata: Map::new(),
        }
    }

    pub fn builder() -> GenerateRequestBuilder {
        GenerateRequestBuilder::new()
    }
}

/// Builder for GenerateRequest
#[derive(Debug, Default)]
pub struct GenerateRequestBuilder {
    prompt: String,
    model: String,
    max_tokens: Option<u32>,
    temperature: Option<f64>,
    metadata: Map<String, Value>,
}

impl GenerateRequestBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn build(self) -> GenerateRequest {
        GenerateRequest {
            prompt: self.prompt,
            model: self.model,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            metadata: self.metadata,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_sets_optional_fields() {
        let request = GenerateRequest::builder()
            .model("gpt-4o-mini")
            .prompt("Summarize the incident")
            .max_tokens(256)
            .temperature(0.2)
            .metadata("incident_id", 42)
            .build();

        assert_eq!(request.model, "gpt-4o-mini");
        assert_eq!(request.prompt, "Summarize the incident");
        assert_eq!(request.max_tokens, Some(256));
        assert_eq!(request.temperature, Some(0.2));
        assert_eq!(request.metadata.get("incident_id"), Some(&Value::from(42)));
    }

    #[test]
    fn test_metadata_defaults_when_absent() {
        let request: GenerateRequest =
            serde_json::from_str(r#"{"prompt":"hi","model":"gpt-4o"}"#).unwrap();

        assert!(request.metadata.is_empty());
        assert!(request.max_tokens.is_none());
        assert!(request.temperature.is_none());
    }
}
