use std::io::Read;
use std::path::Path;

use polyfetch_agent::Tool;
use serde_json::Value;

use crate::cli::InvokeArgs;
use crate::error::CliError;

use super::CommandResult;

pub async fn run(args: &InvokeArgs, tool: &dyn Tool) -> Result<CommandResult, CliError> {
    let input = read_input(args.input.as_deref())?;
    let output = tool.invoke(input).await?;
    let data = serde_json::from_str(&output)?;
    Ok(CommandResult::from_tool_output(data))
}

/// Read the invocation JSON from `path`, or stdin when it is absent or `-`.
fn read_input(path: Option<&Path>) -> Result<Value, CliError> {
    let text = match path {
        Some(path) if path != Path::new("-") => std::fs::read_to_string(path)?,
        _ => {
            let mut text = String::new();
            std::io::stdin().read_to_string(&mut text)?;
            text
        }
    };

    serde_json::from_str(&text).map_err(CliError::MalformedInput)
}
