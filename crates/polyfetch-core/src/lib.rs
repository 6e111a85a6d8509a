//! # polyfetch core
//!
//! Endpoint Gateway and domain contracts for the Polygon market-data tool.
//!
//! ## Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`clock`] | Source of "today" and the local offset |
//! | [`config`] | API key and base URL resolution |
//! | [`domain`] | Validated request types |
//! | [`error`] | Validation, configuration and remote-call errors |
//! | [`gateway`] | One operation per Polygon endpoint |
//! | [`http_client`] | Transport abstraction (reqwest in production) |
//! | [`table`] | Aggregate bars rendered as a text table |
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────┐
//! │  Orchestrator    │  (polyfetch-agent)
//! └────────┬─────────┘
//!          │ one call per lookup
//!          ▼
//! ┌──────────────────┐     ┌──────────────────┐
//! │ EndpointGateway  │────▶│ HttpClient       │
//! │ (PolygonGateway) │     │ (reqwest)        │
//! └──────────────────┘     └──────────────────┘
//! ```
//!
//! ## Security
//!
//! - The API key travels only in the `apiKey` query parameter
//! - Logged URLs and `Debug` output never include the key

pub mod clock;
pub mod config;
pub mod domain;
pub mod error;
pub mod gateway;
pub mod http_client;
pub mod table;

pub use clock::{Clock, FixedClock, SystemClock};

pub use config::{load_credential, GatewayConfig, API_KEY_ENV, BASE_URL_ENV, DEFAULT_BASE_URL};

pub use domain::{
    AggregateRange, AggregationRequest, RangeBound, SnapshotFlags, SortOrder, Ticker, Timespan,
    TradeDate,
};

pub use error::{ConfigurationError, RemoteCallError, ValidationError};

pub use gateway::{EndpointGateway, GatewayFuture, PolygonGateway};

pub use http_client::{
    HttpAuth, HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient,
};

pub use table::{format_timestamp, RenderedTable, TableError, TableRow};
