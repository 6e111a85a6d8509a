use polyfetch_agent::PolygonDataTool;

use crate::error::CliError;

use super::CommandResult;

pub fn run() -> Result<CommandResult, CliError> {
    let data = serde_json::to_value(PolygonDataTool::description())?;
    Ok(CommandResult::ok(data))
}
