use polyfetch_agent::ToolError;
use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Configuration(#[from] polyfetch_core::ConfigurationError),

    #[error(transparent)]
    Tool(#[from] ToolError),

    #[error("invocation input is not valid JSON: {0}")]
    MalformedInput(serde_json::Error),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Configuration(_) => 2,
            Self::Tool(ToolError::InvalidInput(_)) => 2,
            Self::Tool(ToolError::Serialization(_)) => 4,
            Self::MalformedInput(_) => 2,
            Self::Serialization(_) => 4,
            Self::Io(_) => 10,
        }
    }
}
