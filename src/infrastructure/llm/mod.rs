//! Provider adapter implementations

mod anthropic;
mod factory;
mod http_client;
mod normalize;
mod openai;

pub use anthropic::{AnthropicProvider, ANTHROPIC_MODELS, DEFAULT_ANTHROPIC_BASE_URL};
pub use factory::LlmProviderFactory;
pub use http_client::{HttpClient, HttpClientTrait, HttpResponse, TransportError};
pub use openai::{OpenAiProvider, DEFAULT_OPENAI_BASE_URL, OPENAI_MODELS};
