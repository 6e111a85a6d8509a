use std::fmt::{Display, Formatter};

use thiserror::Error;

/// Validation errors raised while building domain values from caller input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("ticker cannot be empty")]
    EmptyTicker,

    #[error("date must be a calendar date in YYYY-MM-DD format: '{value}'")]
    InvalidDate { value: String },
    #[error("range bound must be YYYY-MM-DD or a millisecond timestamp: '{value}'")]
    InvalidRangeBound { value: String },

    #[error(
        "invalid timespan '{value}', expected one of minute, hour, day, week, month, quarter, year"
    )]
    InvalidTimespan { value: String },
    #[error("invalid sort '{value}', expected asc or desc")]
    InvalidSort { value: String },

    #[error("field '{field}' must be a positive integer")]
    NonPositive { field: &'static str },
}

/// Raised once at construction when the provider credential cannot be resolved.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigurationError {
    #[error("missing {var} environment variable")]
    MissingCredential { var: &'static str },
}

/// Failure of a single provider lookup.
///
/// Carried inline in the aggregated response; never aborts sibling lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteCallError {
    /// The provider answered with a non-2xx status.
    Status { status: u16, body: String },
    /// The call never reached the provider (DNS, TLS, connect, read errors).
    Transport { message: String },
    /// A 2xx body that is not valid JSON.
    Decode { message: String },
}

impl RemoteCallError {
    pub const DEFAULT_MESSAGE: &'static str = "remote call failed without further detail";

    pub fn status(status: u16, body: impl Into<String>) -> Self {
        Self::Status {
            status,
            body: body.into(),
        }
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport {
            message: message.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        Self::Decode {
            message: message.into(),
        }
    }

    /// HTTP status returned by the provider, when the call got that far.
    pub const fn status_code(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            Self::Transport { .. } | Self::Decode { .. } => None,
        }
    }

    /// Human-readable message, never empty.
    pub fn message(&self) -> String {
        let message = match self {
            Self::Status { status, body } => {
                let body = body.trim();
                if body.is_empty() {
                    format!("Request failed with status {status}")
                } else {
                    format!("Request failed with status {status}: {body}")
                }
            }
            Self::Transport { message } => message.trim().to_owned(),
            Self::Decode { message } => {
                let message = message.trim();
                if message.is_empty() {
                    String::new()
                } else {
                    format!("failed to decode provider response: {message}")
                }
            }
        };

        if message.is_empty() {
            String::from(Self::DEFAULT_MESSAGE)
        } else {
            message
        }
    }
}

impl Display for RemoteCallError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message())
    }
}

impl std::error::Error for RemoteCallError {}
