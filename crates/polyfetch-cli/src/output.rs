use std::io::Write;

use serde_json::Value;

use crate::error::CliError;

/// Serialize `value` as one JSON document.
pub fn to_json(value: &Value, pretty: bool) -> Result<String, CliError> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(text)
}

/// Write `value` to stdout followed by a newline.
pub fn render(value: &Value, pretty: bool) -> Result<(), CliError> {
    let text = to_json(value, pretty)?;
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{text}")?;
    stdout.flush()?;
    Ok(())
}
