//! Generate command - dispatch one prompt and print the normalized response

use clap::Args;
use tracing::warn;

use crate::domain::usage::{UsageRecord, UsageRecorder};
use crate::domain::{GenerateRequest, GenerateResponse};
use crate::infrastructure::usage::TracingUsageRecorder;

/// Generate command arguments
#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Model identifier, e.g. gpt-4o
    #[arg(short, long)]
    pub model: String,

    /// Prompt text
    #[arg(short, long)]
    pub prompt: String,

    #[arg(long)]
    pub max_tokens: Option<u32>,

    #[arg(long)]
    pub temperature: Option<f64>,

    /// Caller metadata as key=value, repeatable
    #[arg(long = "metadata", value_parser = parse_key_value)]
    pub metadata: Vec<(String, String)>,
}

impl GenerateArgs {
    fn to_request(&self) -> GenerateRequest {
        let mut builder = GenerateRequest::builder()
            .model(&self.model)
            .prompt(&self.prompt);

        if let Some(max_tokens) = self.max_tokens {
            builder = builder.max_tokens(max_tokens);
        }
        if let Some(temperature) = self.temperature {
            builder = builder.temperature(temperature);
        }
        for (key, value) in &self.metadata {
            builder = builder.metadata(key, value.as_str());
        }

        builder.build()
    }
}

/// Run the generate command. Fails after printing when no provider succeeded.
pub async fn run(args: GenerateArgs) -> anyhow::Result<()> {
    let orchestrator = super::bootstrap()?;

    let request = args.to_request();
    let result = orchestrator.dispatch(&request).await;

    record_usage(&TracingUsageRecorder::new(), &request, &result.response).await;

    println!("{}", serde_json::to_string_pretty(&result.response)?);

    if !result.is_success() {
        anyhow::bail!(
            "{}",
            result.response.error().unwrap_or("generation failed")
        );
    }

    Ok(())
}

async fn record_usage(
    recorder: &dyn UsageRecorder,
    request: &GenerateRequest,
    response: &GenerateResponse,
) {
    let record = UsageRecord::from_dispatch(request, response);

    if let Err(e) = recorder.record(record).await {
        warn!(error = %e, "Failed to record usage");
    }
}

fn parse_key_value(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected key=value, got '{}'", raw)),
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::cli::{Cli, Command};
    use crate::domain::FailureCategory;
    use crate::infrastructure::usage::InMemoryUsageRecorder;

    fn parse(args: &[&str]) -> GenerateArgs {
        let cli = Cli::try_parse_from(args).unwrap();
        match cli.command {
            Command::Generate(args) => args,
            Command::Models => panic!("expected generate"),
        }
    }

    #[test]
    fn test_parse_generate_args() {
        let args = parse(&[
            "ai-dispatch",
            "generate",
            "--model",
            "gpt-4o",
            "--prompt",
            "Summarize",
            "--max-tokens",
            "200",
            "--temperature",
            "0.2",
            "--metadata",
            "incident_id=INC-7",
        ]);

        let request = args.to_request();
        assert_eq!(request.model, "gpt-4o");
        assert_eq!(request.prompt, "Summarize");
        assert_eq!(request.max_tokens, Some(200));
        assert_eq!(request.temperature, Some(0.2));
        assert_eq!(
            request.metadata.get("incident_id"),
            Some(&serde_json::Value::from("INC-7"))
        );
    }

    #[test]
    fn test_optional_parameters_stay_absent() {
        let request = parse(&["ai-dispatch", "generate", "-m", "gpt-4o", "-p", "Hi"]).to_request();

        assert!(request.max_tokens.is_none());
        assert!(request.temperature.is_none());
        assert!(request.metadata.is_empty());
    }

    #[test]
    fn test_parse_key_value() {
        assert_eq!(
            parse_key_value("a=b=c"),
            Ok(("a".to_string(), "b=c".to_string()))
        );
        assert!(parse_key_value("novalue").is_err());
        assert!(parse_key_value("=x").is_err());
    }

    #[tokio::test]
    async fn test_record_usage_for_failed_dispatch() {
        let recorder = InMemoryUsageRecorder::default();
        let request = GenerateRequest::new("unknown", "Hi");
        let response = GenerateResponse::failure(
            FailureCategory::NoEligibleProvider,
            "No AI provider available for model: unknown",
        );

        record_usage(&recorder, &request, &response).await;

        let records = recorder.records().unwrap();
        assert_eq!(records.len(), 1);
        assert!(!records[0].success);
        assert_eq!(records[0].model, "unknown");
    }
}
