use polyfetch_agent::PolygonDataTool;

use crate::cli::FetchArgs;
use crate::error::CliError;

use super::CommandResult;

pub async fn run(args: &FetchArgs, tool: &PolygonDataTool) -> Result<CommandResult, CliError> {
    let input = args.to_input();
    tracing::debug!(ticker = %args.ticker, only = ?args.only, "fetch");

    let response = match args.only {
        Some(key) => tool.run_only(&input, key).await?,
        None => tool.run(&input).await?,
    };

    Ok(CommandResult {
        data: serde_json::to_value(&response)?,
        failed_lookups: response.failure_count(),
    })
}
