//! Models command - list routable models

use crate::domain::ModelCompatibilityRegistry;

/// Print each model with its providers in fallback order
pub async fn run() -> anyhow::Result<()> {
    let orchestrator = super::bootstrap()?;
    let registry = orchestrator.registry();

    if registry.is_empty() {
        eprintln!("No providers configured. Set OPENAI_API_KEY or ANTHROPIC_API_KEY.");
        return Ok(());
    }

    for line in render(registry) {
        println!("{}", line);
    }

    Ok(())
}

fn render(registry: &ModelCompatibilityRegistry) -> Vec<String> {
    registry
        .models()
        .map(|(model, providers)| format!("{}\t{}", model, providers.join(" -> ")))
        .collect()
}
