use anyhow::{anyhow, bail, Context, Result};
use std::io::Read;
use std::sync::Arc;
use tracing::info;

use archaive_core::{ArchError, ModelConfig, ModelProvider};
use archaive_flows::{
    generate_investor_pitch, generate_query_response, generate_strategic_roadmap,
    generate_user_journey_map, FlowRunner,
};
use archaive_llm::create_provider;
use archaive_tools::default_registry;

use crate::cli::Cli;

/// Message shown for transient provider failures, matching the web app
const RETRY_LATER: &str =
    "The AI model seems to be overloaded at the moment. Please try your search again in a few minutes.";

pub async fn execute(
    cli: &Cli,
    flow: &str,
    input: Option<&str>,
    input_file: Option<&str>,
    output: &str,
) -> Result<()> {
    let raw = read_input(input, input_file)?;

    let mut config = ModelConfig::new(cli.model.clone(), ModelProvider::Google);
    if let Some(endpoint) = &cli.endpoint {
        config = config.with_endpoint(endpoint.clone());
    }
    let model = create_provider(config)?;
    let runner =
        FlowRunner::new(model).with_tools(Arc::new(default_registry().into_executor()));

    info!(flow, "Running flow");

    let result = match flow {
        "investor_pitch" => {
            let parsed = parse_input(&raw)?;
            to_value(generate_investor_pitch(&runner, &parsed).await)?
        }
        "strategic_roadmap" => {
            let parsed = parse_input(&raw)?;
            to_value(generate_strategic_roadmap(&runner, &parsed).await)?
        }
        "user_journey" => {
            let parsed = parse_input(&raw)?;
            to_value(generate_user_journey_map(&runner, &parsed).await)?
        }
        "query_response" => {
            let parsed = parse_input(&raw)?;
            to_value(generate_query_response(&runner, &parsed).await)?
        }
        other => bail!("Unknown flow '{}' (see 'archaivectl list')", other),
    };

    match output {
        "json" => println!("{}", serde_json::to_string_pretty(&result)?),
        "text" => print_text(&result),
        other => bail!("Unknown output format '{}' (expected json or text)", other),
    }

    Ok(())
}

fn read_input(input: Option<&str>, input_file: Option<&str>) -> Result<String> {
    if let Some(inline) = input {
        return Ok(inline.to_string());
    }
    match input_file {
        Some(path) if path != "-" => {
            std::fs::read_to_string(path).with_context(|| format!("Failed to read {}", path))
        }
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read input from stdin")?;
            Ok(buf)
        }
    }
}

fn parse_input<I: serde::de::DeserializeOwned>(raw: &str) -> Result<I> {
    serde_json::from_str(raw).context("Input is not valid JSON for this flow")
}

fn to_value<O: serde::Serialize>(result: archaive_core::ArchResult<O>) -> Result<serde_json::Value> {
    match result {
        Ok(output) => Ok(serde_json::to_value(output)?),
        Err(ArchError::FieldValidation(errors)) => {
            let detail = errors
                .iter()
                .map(|e| format!("  - {}", e))
                .collect::<Vec<_>>()
                .join("\n");
            Err(anyhow!("Invalid fields. Please check your inputs.\n{}", detail))
        }
        Err(e) if e.is_retry_later() => {
            info!(error = %e, "Provider failure");
            Err(anyhow!("{}", RETRY_LATER))
        }
        Err(e) => Err(e.into()),
    }
}

/// Human-readable rendering: string fields as sections, everything else
/// pretty-printed JSON
fn print_text(value: &serde_json::Value) {
    match value {
        serde_json::Value::Object(map) => {
            for (key, field) in map {
                match field {
                    serde_json::Value::String(s) => {
                        println!("== {} ==\n{}\n", key, s);
                    }
                    serde_json::Value::Null => {}
                    other => {
                        println!(
                            "== {} ==\n{}\n",
                            key,
                            serde_json::to_string_pretty(other).unwrap_or_default()
                        );
                    }
                }
            }
        }
        other => println!("{}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use archaive_core::FieldError;

    #[test]
    fn test_field_validation_message_lists_fields() {
        let result: archaive_core::ArchResult<()> = Err(ArchError::fields(vec![
            FieldError::new("query", "Please enter a search query."),
        ]));
        let err = to_value(result).unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("Invalid fields"));
        assert!(msg.contains("query: Please enter a search query."));
    }

    #[test]
    fn test_retry_later_message_for_provider_failures() {
        let result: archaive_core::ArchResult<()> =
            Err(ArchError::unavailable("503 from upstream"));
        let err = to_value(result).unwrap_err();
        assert_eq!(
            format!("{err}"),
            "The AI model seems to be overloaded at the moment. \
             Please try your search again in a few minutes."
        );
    }

    #[test]
    fn test_config_errors_pass_through() {
        let result: archaive_core::ArchResult<()> = Err(ArchError::config("no api key"));
        let err = to_value(result).unwrap_err();
        assert!(format!("{err}").contains("no api key"));
    }
}
