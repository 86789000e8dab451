//! API key sources

mod env_provider;

pub use env_provider::{EnvKeySource, StaticKeySource};

use std::fmt::Debug;

/// Resolves a provider API key by the name of the variable that holds it.
///
/// Read once while building adapters; a `None` keeps that provider out of
/// the registry for the life of the process.
pub trait ApiKeySource: Send + Sync + Debug {
    fn api_key(&self, variable: &str) -> Option<String>;
}
