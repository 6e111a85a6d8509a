//! Endpoint Gateway.
//!
//! One operation per supported Polygon endpoint. Each builds a deterministic
//! path, attaches the `apiKey` credential, performs exactly one round trip and
//! maps anything but a 2xx answer to [`RemoteCallError`].
//!
//! | Operation | Endpoint |
//! |-----------|----------|
//! | [`EndpointGateway::fetch_daily_open_close`] | `GET /v1/open-close/{ticker}/{date}` |
//! | [`EndpointGateway::fetch_previous_close`] | `GET /v2/aggs/ticker/{ticker}/prev` |
//! | [`EndpointGateway::fetch_ticker_snapshot`] | `GET /v2/snapshot/locale/us/markets/stocks/tickers/{ticker}` |
//! | [`EndpointGateway::fetch_aggregate_bars`] | `GET /v2/aggs/ticker/{ticker}/range/{multiplier}/{timespan}/{from}/{to}` |

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde_json::Value;

use crate::config::GatewayConfig;
use crate::domain::{AggregateRange, SnapshotFlags, Ticker, TradeDate};
use crate::http_client::{HttpAuth, HttpClient, HttpRequest, ReqwestHttpClient};
use crate::RemoteCallError;

/// Boxed future returned by every gateway operation.
pub type GatewayFuture<'a> = Pin<Box<dyn Future<Output = Result<Value, RemoteCallError>> + Send + 'a>>;

/// Provider lookups used by the orchestrator.
pub trait EndpointGateway: Send + Sync {
    fn fetch_daily_open_close<'a>(&'a self, ticker: &'a Ticker, date: TradeDate) -> GatewayFuture<'a>;

    fn fetch_previous_close<'a>(&'a self, ticker: &'a Ticker) -> GatewayFuture<'a>;

    fn fetch_ticker_snapshot<'a>(
        &'a self,
        ticker: &'a Ticker,
        flags: SnapshotFlags,
    ) -> GatewayFuture<'a>;

    fn fetch_aggregate_bars<'a>(
        &'a self,
        ticker: &'a Ticker,
        range: &'a AggregateRange,
    ) -> GatewayFuture<'a>;
}

/// Polygon.io REST gateway.
#[derive(Clone)]
pub struct PolygonGateway {
    config: GatewayConfig,
    auth: HttpAuth,
    http_client: Arc<dyn HttpClient>,
}

impl PolygonGateway {
    pub const API_KEY_PARAM: &'static str = "apiKey";

    pub fn new(config: GatewayConfig) -> Self {
        Self::with_http_client(config, Arc::new(ReqwestHttpClient::default()))
    }

    pub fn with_http_client(config: GatewayConfig, http_client: Arc<dyn HttpClient>) -> Self {
        let auth = HttpAuth::QueryParam {
            name: String::from(Self::API_KEY_PARAM),
            value: config.api_key().to_owned(),
        };
        Self {
            config,
            auth,
            http_client,
        }
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    pub fn daily_open_close_request(&self, ticker: &Ticker, date: TradeDate) -> HttpRequest {
        self.request(format!(
            "/v1/open-close/{}/{}",
            ticker.path_segment(),
            date
        ))
    }

    pub fn previous_close_request(&self, ticker: &Ticker) -> HttpRequest {
        self.request(format!("/v2/aggs/ticker/{}/prev", ticker.path_segment()))
    }

    pub fn ticker_snapshot_request(&self, ticker: &Ticker, flags: SnapshotFlags) -> HttpRequest {
        flags.query_params().into_iter().fold(
            self.request(format!(
                "/v2/snapshot/locale/us/markets/stocks/tickers/{}",
                ticker.path_segment()
            )),
            |request, (name, value)| request.with_query(name, value),
        )
    }

    pub fn aggregate_bars_request(&self, ticker: &Ticker, range: &AggregateRange) -> HttpRequest {
        self.request(format!(
            "/v2/aggs/ticker/{}/range/{}/{}/{}/{}",
            ticker.path_segment(),
            range.multiplier,
            range.timespan,
            range.from,
            range.to
        ))
        .with_query("adjusted", range.adjusted.to_string())
        .with_query("sort", range.sort.as_str())
        .with_query("limit", range.limit.to_string())
    }

    fn request(&self, path: String) -> HttpRequest {
        HttpRequest::get(format!("{}{path}", self.config.base_url())).with_auth(&self.auth)
    }

    async fn fetch_json(&self, request: HttpRequest) -> Result<Value, RemoteCallError> {
        let endpoint = request.display_url();
        tracing::debug!(%endpoint, "polygon request");

        let response = self.http_client.execute(request).await.map_err(|error| {
            tracing::warn!(%endpoint, error = %error, "polygon transport error");
            RemoteCallError::transport(error.message())
        })?;

        if !response.is_success() {
            tracing::warn!(%endpoint, status = response.status, "polygon returned non-success status");
            return Err(RemoteCallError::status(response.status, response.body));
        }

        serde_json::from_str(&response.body).map_err(|error| {
            tracing::warn!(%endpoint, error = %error, "polygon returned undecodable body");
            RemoteCallError::decode(error.to_string())
        })
    }
}

impl std::fmt::Debug for PolygonGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PolygonGateway")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl EndpointGateway for PolygonGateway {
    fn fetch_daily_open_close<'a>(&'a self, ticker: &'a Ticker, date: TradeDate) -> GatewayFuture<'a> {
        Box::pin(self.fetch_json(self.daily_open_close_request(ticker, date)))
    }

    fn fetch_previous_close<'a>(&'a self, ticker: &'a Ticker) -> GatewayFuture<'a> {
        Box::pin(self.fetch_json(self.previous_close_request(ticker)))
    }

    fn fetch_ticker_snapshot<'a>(
        &'a self,
        ticker: &'a Ticker,
        flags: SnapshotFlags,
    ) -> GatewayFuture<'a> {
        Box::pin(self.fetch_json(self.ticker_snapshot_request(ticker, flags)))
    }

    fn fetch_aggregate_bars<'a>(
        &'a self,
        ticker: &'a Ticker,
        range: &'a AggregateRange,
    ) -> GatewayFuture<'a> {
        Box::pin(self.fetch_json(self.aggregate_bars_request(ticker, range)))
    }
}
