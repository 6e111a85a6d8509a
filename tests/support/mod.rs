//! Shared fakes for the behavior tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use polyfetch_agent::{LookupKey, PolygonDataTool};
use polyfetch_core::{
    AggregateRange, EndpointGateway, FixedClock, GatewayFuture, RemoteCallError, SnapshotFlags,
    Ticker, TradeDate,
};
use serde_json::{json, Value};
use time::macros::datetime;

/// One recorded gateway call.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    DailyOpenClose { ticker: String, date: String },
    PreviousClose { ticker: String },
    TickerSnapshot { ticker: String, flags: SnapshotFlags },
    AggregateBars { ticker: String, range: AggregateRange },
}

impl Call {
    pub fn key(&self) -> LookupKey {
        match self {
            Self::DailyOpenClose { .. } => LookupKey::DailyOpenClose,
            Self::PreviousClose { .. } => LookupKey::PreviousClose,
            Self::TickerSnapshot { .. } => LookupKey::TickerData,
            Self::AggregateBars { .. } => LookupKey::Aggregates,
        }
    }
}

/// Gateway that answers from canned payloads and can fail one chosen lookup.
#[derive(Debug, Default)]
pub struct ScriptedGateway {
    failing: Option<(LookupKey, RemoteCallError)>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedGateway {
    pub fn healthy() -> Self {
        Self::default()
    }

    pub fn failing(key: LookupKey, error: RemoteCallError) -> Self {
        Self {
            failing: Some((key, error)),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls
            .lock()
            .expect("call log should not be poisoned")
            .clone()
    }

    fn answer(&self, call: Call) -> GatewayFuture<'_> {
        let key = call.key();
        self.calls
            .lock()
            .expect("call log should not be poisoned")
            .push(call);

        let result = match &self.failing {
            Some((failing, error)) if *failing == key => Err(error.clone()),
            _ => Ok(payload_for(key)),
        };
        Box::pin(async move { result })
    }
}

impl EndpointGateway for ScriptedGateway {
    fn fetch_daily_open_close<'a>(&'a self, ticker: &'a Ticker, date: TradeDate) -> GatewayFuture<'a> {
        self.answer(Call::DailyOpenClose {
            ticker: ticker.to_string(),
            date: date.to_string(),
        })
    }

    fn fetch_previous_close<'a>(&'a self, ticker: &'a Ticker) -> GatewayFuture<'a> {
        self.answer(Call::PreviousClose {
            ticker: ticker.to_string(),
        })
    }

    fn fetch_ticker_snapshot<'a>(
        &'a self,
        ticker: &'a Ticker,
        flags: SnapshotFlags,
    ) -> GatewayFuture<'a> {
        self.answer(Call::TickerSnapshot {
            ticker: ticker.to_string(),
            flags,
        })
    }

    fn fetch_aggregate_bars<'a>(
        &'a self,
        ticker: &'a Ticker,
        range: &'a AggregateRange,
    ) -> GatewayFuture<'a> {
        self.answer(Call::AggregateBars {
            ticker: ticker.to_string(),
            range: *range,
        })
    }
}

/// Canned provider body per lookup.
pub fn payload_for(key: LookupKey) -> Value {
    match key {
        LookupKey::DailyOpenClose => json!({
            "status": "OK", "from": "2024-01-05", "symbol": "AAPL",
            "open": 181.99, "high": 182.76, "low": 180.17, "close": 181.18, "volume": 62196924
        }),
        LookupKey::PreviousClose => json!({
            "ticker": "AAPL", "resultsCount": 1, "status": "OK",
            "results": [{ "T": "AAPL", "v": 62196924, "o": 181.99, "c": 181.18, "h": 182.76, "l": 180.17, "t": 1704488400000_i64 }]
        }),
        LookupKey::TickerData => json!({
            "status": "OK",
            "ticker": { "ticker": "AAPL", "todaysChange": 0.42, "day": { "o": 181.99, "c": 181.18 } }
        }),
        LookupKey::Aggregates => five_daily_bars(),
    }
}

pub fn five_daily_bars() -> Value {
    let bars = [
        (1704171600000_i64, 187.15, 185.64),
        (1704258000000, 184.22, 184.25),
        (1704344400000, 182.15, 181.91),
        (1704430800000, 181.99, 181.18),
        (1704690000000, 182.085, 185.56),
    ]
    .into_iter()
    .enumerate()
    .map(|(index, (t, o, c))| {
        json!({
            "v": 50_000_000.0 + index as f64,
            "vw": (o + c) / 2.0,
            "o": o,
            "c": c,
            "h": o + 1.0,
            "l": c - 1.0,
            "t": t,
            "n": 600_000 + index
        })
    })
    .collect::<Vec<_>>();

    json!({ "ticker": "AAPL", "resultsCount": 5, "adjusted": true, "results": bars, "status": "OK" })
}

/// Tool over `gateway` with the clock pinned to 2024-03-07 (UTC).
pub fn tool_with(gateway: Arc<ScriptedGateway>) -> PolygonDataTool {
    PolygonDataTool::with_gateway(gateway)
        .with_clock(Arc::new(FixedClock(datetime!(2024-03-07 15:30 UTC))))
}

pub fn aggregate_input() -> Value {
    json!({
        "stocksTicker": "AAPL",
        "multiplier": 1,
        "timespan": "day",
        "from": "2024-01-01",
        "to": "2024-01-05"
    })
}
