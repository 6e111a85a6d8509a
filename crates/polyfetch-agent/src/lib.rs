//! # polyfetch-agent
//!
//! Agent-facing side of polyfetch: the `polygon_data_fetcher` tool.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`tool`] | `describe`/`invoke` capability pair and [`PolygonDataTool`] |
//! | [`schema`] | Input JSON schema and validator |
//! | [`input`] | Wire input and conversion into a domain request |
//! | [`orchestrator`] | Fan-out, per-lookup failure isolation, assembly |
//! | [`response`] | Ordered composite response |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use polyfetch_agent::{PolygonDataTool, Tool};
//! use serde_json::json;
//!
//! let tool = PolygonDataTool::from_env()?;
//! let output = tool.invoke(json!({ "stocksTicker": "AAPL" })).await?;
//! // {"dailyOpenClose":{...},"previousClose":{...},"tickerData":{...}}
//! ```
//!
//! Only malformed input fails an invocation; a failing lookup shows up as
//! `{"error": "..."}` in its own slot.

pub mod input;
pub mod orchestrator;
pub mod response;
pub mod schema;
pub mod tool;

pub use input::ToolInput;
pub use orchestrator::{AggregatesFormat, Orchestrator, NON_TRADING_DAY_HINT};
pub use response::{AggregationResponse, LookupKey, LookupOutcome};
pub use schema::{input_schema, validate_against_schema, InputValidationError, SchemaIssue};
pub use tool::{
    InvokeFuture, PolygonDataTool, Tool, ToolDescription, ToolError, TOOL_DESCRIPTION, TOOL_NAME,
};
