mod describe;
mod fetch;
mod invoke;

use polyfetch_agent::{AggregatesFormat, PolygonDataTool};
use polyfetch_core::GatewayConfig;
use serde_json::Value;

use crate::cli::{Cli, Command};
use crate::error::CliError;

pub struct CommandResult {
    pub data: Value,
    pub failed_lookups: usize,
}

impl CommandResult {
    pub fn ok(data: Value) -> Self {
        Self {
            data,
            failed_lookups: 0,
        }
    }

    /// Wrap a tool output, counting the `{"error": ...}` slots in it.
    pub fn from_tool_output(data: Value) -> Self {
        let failed_lookups = data
            .as_object()
            .map(|slots| slots.values().filter(|slot| is_failure_slot(slot)).count())
            .unwrap_or_default();
        Self {
            data,
            failed_lookups,
        }
    }
}

fn is_failure_slot(slot: &Value) -> bool {
    slot.as_object()
        .is_some_and(|fields| fields.len() == 1 && fields.get("error").is_some_and(Value::is_string))
}

pub async fn run(cli: &Cli) -> Result<CommandResult, CliError> {
    match &cli.command {
        Command::Describe => describe::run(),
        Command::Invoke(args) => invoke::run(args, &build_tool(cli)?).await,
        Command::Fetch(args) => fetch::run(args, &build_tool(cli)?).await,
    }
}

/// Tool configured from global flags, falling back to the environment.
fn build_tool(cli: &Cli) -> Result<PolygonDataTool, CliError> {
    let mut config = GatewayConfig::resolve(cli.api_key.clone(), |name| std::env::var(name).ok())?;
    if let Some(base_url) = &cli.base_url {
        config = config.with_base_url(base_url.as_str());
    }

    let format = if cli.table {
        AggregatesFormat::Table
    } else {
        AggregatesFormat::Raw
    };
    tracing::debug!(?config, ?format, "tool configured");

    Ok(PolygonDataTool::new(config).with_aggregates_format(format))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use serde_json::json;

    #[test]
    fn failure_slots_are_counted() {
        let result = CommandResult::from_tool_output(json!({
            "dailyOpenClose": { "error": "Request failed with status 404 (likely not a trading day)" },
            "previousClose": { "status": "OK", "results": [] },
            "tickerData": { "error": "connection refused" }
        }));
        assert_eq!(result.failed_lookups, 2);
    }

    #[test]
    fn provider_bodies_with_extra_fields_are_not_failures() {
        let result = CommandResult::from_tool_output(json!({
            "tickerData": { "status": "OK", "error": "partial" }
        }));
        assert_eq!(result.failed_lookups, 0);
    }

    #[test]
    fn global_flags_shape_the_tool() {
        let cli = Cli::try_parse_from([
            "polyfetch",
            "--api-key",
            "test-key",
            "--base-url",
            "http://localhost:8080/",
            "--table",
            "describe",
        ])
        .expect("arguments should parse");

        let tool = build_tool(&cli).expect("explicit key should be enough");
        assert_eq!(tool.orchestrator().aggregates_format(), AggregatesFormat::Table);
    }
}
