//! # Tool capability pair
//!
//! Anything that can `describe` itself and be `invoke`d with a JSON input can
//! be registered with a calling agent framework. [`PolygonDataTool`] is the
//! Polygon market-data implementation.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use polyfetch_core::{
    AggregationRequest, Clock, ConfigurationError, EndpointGateway, GatewayConfig, PolygonGateway,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::Instrument;
use uuid::Uuid;

use crate::input::ToolInput;
use crate::orchestrator::{AggregatesFormat, Orchestrator};
use crate::response::{AggregationResponse, LookupKey};
use crate::schema::{input_schema, InputValidationError};

pub const TOOL_NAME: &str = "polygon_data_fetcher";

pub const TOOL_DESCRIPTION: &str = "Fetches market data for one stock ticker from Polygon.io: \
the daily open/close for a date (defaults to today), the previous day's close, the live \
ticker snapshot and, when multiplier, timespan, from and to are all given, historical \
aggregate bars. Each lookup reports its own result or error.";

/// Name, description and input schema advertised to the agent framework.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDescription {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

/// Errors that abort a whole invocation. Per-lookup failures never do.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error(transparent)]
    InvalidInput(#[from] InputValidationError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Boxed future returned by [`Tool::invoke`].
pub type InvokeFuture<'a> = Pin<Box<dyn Future<Output = Result<String, ToolError>> + Send + 'a>>;

pub trait Tool: Send + Sync {
    fn describe(&self) -> ToolDescription;

    /// Validate `input`, run the tool and return its serialized output.
    fn invoke<'a>(&'a self, input: Value) -> InvokeFuture<'a>;
}

/// Aggregating Polygon market-data tool.
#[derive(Debug, Clone)]
pub struct PolygonDataTool {
    orchestrator: Orchestrator,
}

impl PolygonDataTool {
    /// Build against the live provider, reading the key from `POLYGON_API_KEY`.
    pub fn from_env() -> Result<Self, ConfigurationError> {
        GatewayConfig::from_env().map(Self::new)
    }

    pub fn new(config: GatewayConfig) -> Self {
        Self::with_gateway(Arc::new(PolygonGateway::new(config)))
    }

    pub fn with_gateway(gateway: Arc<dyn EndpointGateway>) -> Self {
        Self {
            orchestrator: Orchestrator::new(gateway),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.orchestrator = self.orchestrator.with_clock(clock);
        self
    }

    pub fn with_aggregates_format(mut self, format: AggregatesFormat) -> Self {
        self.orchestrator = self.orchestrator.with_aggregates_format(format);
        self
    }

    /// The advertised description; needs no credential.
    pub fn description() -> ToolDescription {
        ToolDescription {
            name: String::from(TOOL_NAME),
            description: String::from(TOOL_DESCRIPTION),
            input_schema: input_schema(),
        }
    }

    pub fn orchestrator(&self) -> &Orchestrator {
        &self.orchestrator
    }

    /// Validate an invocation input without touching the network.
    pub fn parse_input(&self, input: &Value) -> Result<AggregationRequest, InputValidationError> {
        ToolInput::parse(input)
    }

    /// Validate and run every applicable lookup.
    pub async fn run(&self, input: &Value) -> Result<AggregationResponse, ToolError> {
        let request = self.parse_input(input)?;
        Ok(self.orchestrator.run(&request).await)
    }

    /// Validate and run a single lookup.
    pub async fn run_only(
        &self,
        input: &Value,
        key: LookupKey,
    ) -> Result<AggregationResponse, ToolError> {
        let request = self.parse_input(input)?;
        Ok(self.orchestrator.run_only(&request, key).await)
    }
}

impl Tool for PolygonDataTool {
    fn describe(&self) -> ToolDescription {
        Self::description()
    }

    fn invoke<'a>(&'a self, input: Value) -> InvokeFuture<'a> {
        let invocation_id = Uuid::new_v4();
        let span = tracing::info_span!("invoke", tool = TOOL_NAME, %invocation_id);

        Box::pin(
            async move {
                let response = self.run(&input).await.inspect_err(|error| {
                    tracing::warn!(error = %error, "invocation rejected");
                })?;
                Ok(serde_json::to_string(&response)?)
            }
            .instrument(span),
        )
    }
}
