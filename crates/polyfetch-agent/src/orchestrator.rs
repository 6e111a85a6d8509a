//! # Aggregation Orchestrator
//!
//! Fans one validated request out to the gateway, isolates each lookup's
//! failure and assembles a single [`AggregationResponse`].
//!
//! Lookups run concurrently; the response order is fixed by assembly
//! (`dailyOpenClose`, `previousClose`, `tickerData`, `aggregates`), never by
//! completion order.

use std::sync::Arc;

use polyfetch_core::{
    AggregationRequest, Clock, EndpointGateway, RemoteCallError, RenderedTable, SystemClock,
    TradeDate,
};
use serde_json::Value;
use tracing::Instrument;

use crate::response::{AggregationResponse, LookupKey, LookupOutcome};

/// Hint appended when the provider has no open/close for the requested date.
pub const NON_TRADING_DAY_HINT: &str = "likely not a trading day";

/// How a successful `aggregates` lookup is reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AggregatesFormat {
    /// Provider JSON as returned.
    #[default]
    Raw,
    /// Text table, one row per bar.
    Table,
}

#[derive(Clone)]
pub struct Orchestrator {
    gateway: Arc<dyn EndpointGateway>,
    clock: Arc<dyn Clock>,
    aggregates_format: AggregatesFormat,
}

impl Orchestrator {
    pub fn new(gateway: Arc<dyn EndpointGateway>) -> Self {
        Self {
            gateway,
            clock: Arc::new(SystemClock),
            aggregates_format: AggregatesFormat::Raw,
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_aggregates_format(mut self, aggregates_format: AggregatesFormat) -> Self {
        self.aggregates_format = aggregates_format;
        self
    }

    pub const fn aggregates_format(&self) -> AggregatesFormat {
        self.aggregates_format
    }

    /// Date used for the daily open/close lookup: the requested one, else today.
    pub fn resolve_date(&self, request: &AggregationRequest) -> TradeDate {
        request
            .date
            .unwrap_or_else(|| TradeDate::from_date(self.clock.today()))
    }

    /// Run every applicable lookup. Never fails as a whole.
    pub async fn run(&self, request: &AggregationRequest) -> AggregationResponse {
        let date = self.resolve_date(request);
        let span = tracing::info_span!("aggregate", ticker = %request.ticker, %date);

        async {
            let (daily, previous, snapshot, aggregates) = tokio::join!(
                self.lookup(LookupKey::DailyOpenClose, request, date),
                self.lookup(LookupKey::PreviousClose, request, date),
                self.lookup(LookupKey::TickerData, request, date),
                self.lookup(LookupKey::Aggregates, request, date),
            );

            let mut response = AggregationResponse::new();
            for (key, result) in LookupKey::ALL
                .into_iter()
                .zip([daily, previous, snapshot, aggregates])
            {
                if let Some(result) = result {
                    response.insert(key, self.outcome(key, result));
                }
            }

            tracing::info!(
                attempted = response.len(),
                failed = response.failure_count(),
                "aggregation complete"
            );
            response
        }
        .instrument(span)
        .await
    }

    /// Run a single lookup; the response is empty when `key` does not apply.
    pub async fn run_only(&self, request: &AggregationRequest, key: LookupKey) -> AggregationResponse {
        let date = self.resolve_date(request);
        let mut response = AggregationResponse::new();
        if let Some(result) = self
            .lookup(key, request, date)
            .instrument(tracing::info_span!("lookup", ticker = %request.ticker, lookup = %key))
            .await
        {
            response.insert(key, self.outcome(key, result));
        }
        response
    }

    /// `None` when the lookup does not apply to this request.
    async fn lookup(
        &self,
        key: LookupKey,
        request: &AggregationRequest,
        date: TradeDate,
    ) -> Option<Result<Value, RemoteCallError>> {
        let ticker = &request.ticker;
        let gateway = self.gateway.as_ref();

        let result = match key {
            LookupKey::DailyOpenClose => gateway.fetch_daily_open_close(ticker, date).await,
            LookupKey::PreviousClose => gateway.fetch_previous_close(ticker).await,
            LookupKey::TickerData => gateway.fetch_ticker_snapshot(ticker, request.snapshot).await,
            LookupKey::Aggregates => {
                let range = request.range.as_ref()?;
                gateway.fetch_aggregate_bars(ticker, range).await
            }
        };
        Some(result)
    }

    fn outcome(&self, key: LookupKey, result: Result<Value, RemoteCallError>) -> LookupOutcome {
        match result {
            Ok(body) => self.success(key, body),
            Err(cause) => {
                tracing::warn!(lookup = %key, error = %cause, "lookup failed");
                let mut outcome = LookupOutcome::failed(cause);
                if let LookupOutcome::Failed { message, cause } = &mut outcome {
                    if key == LookupKey::DailyOpenClose && cause.status_code() == Some(404) {
                        message.push_str(&format!(" ({NON_TRADING_DAY_HINT})"));
                    }
                }
                outcome
            }
        }
    }

    fn success(&self, key: LookupKey, body: Value) -> LookupOutcome {
        if key != LookupKey::Aggregates || self.aggregates_format != AggregatesFormat::Table {
            return LookupOutcome::Success(body);
        }

        match RenderedTable::from_payload(&body, self.clock.as_ref()) {
            Ok(table) => LookupOutcome::Rendered(table.to_string()),
            Err(error) => {
                tracing::warn!(error = %error, "aggregates kept as raw JSON");
                LookupOutcome::Success(body)
            }
        }
    }
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("aggregates_format", &self.aggregates_format)
            .finish_non_exhaustive()
    }
}
