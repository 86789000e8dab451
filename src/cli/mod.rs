//! CLI module for ai-dispatch
//!
//! - `generate`: dispatch one prompt through the provider fallback chain
//! - `models`: list routable models and the providers serving them

pub mod generate;
pub mod models;

use clap::{Parser, Subcommand};

use crate::config::AppConfig;
use crate::domain::FallbackOrchestrator;
use crate::infrastructure::credentials::EnvKeySource;
use crate::infrastructure::llm::LlmProviderFactory;
use crate::infrastructure::logging;

/// ai-dispatch - route text generation across AI providers with fallback
#[derive(Parser)]
#[command(name = "ai-dispatch")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Generate text for a prompt
    Generate(generate::GenerateArgs),

    /// List models and their providers in fallback order
    Models,
}

/// Load `.env`, configuration and logging, then build the orchestrator
/// from every provider that has credentials.
fn bootstrap() -> anyhow::Result<FallbackOrchestrator> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;
    logging::init_logging(&config.logging);

    Ok(LlmProviderFactory::build_orchestrator(
        &config.providers,
        &EnvKeySource::new(),
    )?)
}
