use std::num::NonZeroU32;

use serde::{Deserialize, Serialize};

use crate::domain::{RangeBound, SortOrder, Ticker, Timespan, TradeDate};
use crate::ValidationError;

/// Optional sections requested from the ticker snapshot endpoint.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SnapshotFlags {
    pub include_last_quote: bool,
    pub include_last_trade: bool,
    pub include_prev_day: bool,
    pub include_min: bool,
}

impl SnapshotFlags {
    /// Query parameters for the flags that are set, in a fixed order.
    pub fn query_params(self) -> Vec<(&'static str, &'static str)> {
        [
            ("includeLastQuote", self.include_last_quote),
            ("includeLastTrade", self.include_last_trade),
            ("includePrevDay", self.include_prev_day),
            ("includeMin", self.include_min),
        ]
        .into_iter()
        .filter(|(_, enabled)| *enabled)
        .map(|(name, _)| (name, "true"))
        .collect()
    }
}

/// Historical aggregate-bars window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregateRange {
    pub multiplier: NonZeroU32,
    pub timespan: Timespan,
    pub from: RangeBound,
    pub to: RangeBound,
    pub adjusted: bool,
    pub sort: SortOrder,
    pub limit: NonZeroU32,
}

impl AggregateRange {
    pub const DEFAULT_LIMIT: NonZeroU32 = match NonZeroU32::new(5_000) {
        Some(limit) => limit,
        None => panic!("default limit is non-zero"),
    };

    pub fn new(
        multiplier: u32,
        timespan: Timespan,
        from: RangeBound,
        to: RangeBound,
    ) -> Result<Self, ValidationError> {
        let multiplier = NonZeroU32::new(multiplier).ok_or(ValidationError::NonPositive {
            field: "multiplier",
        })?;
        Ok(Self {
            multiplier,
            timespan,
            from,
            to,
            adjusted: true,
            sort: SortOrder::Asc,
            limit: Self::DEFAULT_LIMIT,
        })
    }

    pub fn with_adjusted(mut self, adjusted: bool) -> Self {
        self.adjusted = adjusted;
        self
    }

    pub fn with_sort(mut self, sort: SortOrder) -> Self {
        self.sort = sort;
        self
    }

    pub fn with_limit(mut self, limit: u32) -> Result<Self, ValidationError> {
        self.limit = NonZeroU32::new(limit).ok_or(ValidationError::NonPositive { field: "limit" })?;
        Ok(self)
    }
}

/// One validated aggregation request for a single ticker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AggregationRequest {
    pub ticker: Ticker,
    pub date: Option<TradeDate>,
    pub snapshot: SnapshotFlags,
    pub range: Option<AggregateRange>,
}

impl AggregationRequest {
    pub fn new(ticker: Ticker) -> Self {
        Self {
            ticker,
            date: None,
            snapshot: SnapshotFlags::default(),
            range: None,
        }
    }

    pub fn with_date(mut self, date: TradeDate) -> Self {
        self.date = Some(date);
        self
    }

    pub fn with_snapshot_flags(mut self, snapshot: SnapshotFlags) -> Self {
        self.snapshot = snapshot;
        self
    }

    pub fn with_range(mut self, range: AggregateRange) -> Self {
        self.range = Some(range);
        self
    }
}
