use std::collections::HashMap;
use std::env;

use super::ApiKeySource;

/// Reads API keys from process environment variables. Unset and blank
/// variables both count as absent.
#[derive(Debug, Default)]
pub struct EnvKeySource;

impl EnvKeySource {
    pub fn new() -> Self {
        Self
    }
}

impl ApiKeySource for EnvKeySource {
    fn api_key(&self, variable: &str) -> Option<String> {
        env::var(variable)
            .ok()
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty())
    }
}

/// Fixed key set, for tests and embedding callers that resolve keys themselves
#[derive(Debug, Default, Clone)]
pub struct StaticKeySource {
    keys: HashMap<String, String>,
}

impl StaticKeySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_key(mut self, variable: impl Into<String>, key: impl Into<String>) -> Self {
        self.keys.insert(variable.into(), key.into());
        self
    }
}

impl ApiKeySource for StaticKeySource {
    fn api_key(&self, variable: &str) -> Option<String> {
        self.keys
            .get(variable)
            .filter(|value| !value.trim().is_empty())
            .cloned()
    }
}
