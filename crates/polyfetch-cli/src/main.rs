mod cli;
mod commands;
mod error;
mod logging;
mod output;

use clap::Parser;
use std::process::ExitCode;

use crate::cli::Cli;
use crate::error::CliError;
use crate::logging::LogFormat;

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(error) = logging::init_logging(LogFormat::from_env()) {
        eprintln!("warning: logging disabled: {error}");
    }

    match run().await {
        Ok(code) => code,
        Err(error) => {
            eprintln!("error: {error}");
            ExitCode::from(error.exit_code())
        }
    }
}

async fn run() -> Result<ExitCode, CliError> {
    let cli = Cli::parse();

    let result = commands::run(&cli).await?;
    output::render(&result.data, cli.pretty)?;

    if result.failed_lookups > 0 {
        tracing::warn!(failed = result.failed_lookups, "some lookups failed");
        return Ok(ExitCode::from(3));
    }

    Ok(ExitCode::SUCCESS)
}
