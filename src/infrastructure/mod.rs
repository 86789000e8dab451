//! Infrastructure layer - provider adapters, credentials, logging and usage sinks

pub mod credentials;
pub mod llm;
pub mod logging;
pub mod usage;
