//! Generation request/response models, provider trait and routing registry

mod compatibility;
mod failure;
mod provider;
mod request;
mod response;

pub use compatibility::ModelCompatibilityRegistry;
pub use failure::{http_error_message, invalid_format_message, FailureCategory, FailureRecord};
pub use provider::{ProviderAdapter, ProviderConfig, REDACTED};
pub use request::{GenerateRequest, GenerateRequestBuilder};
pub use response::GenerateResponse;

#[cfg(test)]
pub use provider::MockProviderAdapter;
