use std::str::FromStr;

use polyfetch_core::{
    AggregateRange, AggregationRequest, RangeBound, SnapshotFlags, SortOrder, Ticker, Timespan,
    TradeDate, ValidationError,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::schema::{input_schema, validate_against_schema, InputValidationError, SchemaIssue};

/// Invocation input as it arrives on the wire.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolInput {
    pub stocks_ticker: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_last_quote: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_last_trade: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_prev_day: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_min: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub multiplier: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timespan: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adjusted: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

impl ToolInput {
    pub fn new(stocks_ticker: impl Into<String>) -> Self {
        Self {
            stocks_ticker: stocks_ticker.into(),
            ..Self::default()
        }
    }

    /// Schema check, decoding and domain validation in one step.
    pub fn parse(value: &Value) -> Result<AggregationRequest, InputValidationError> {
        let value = without_blank_optionals(value);
        validate_against_schema(&value, &input_schema()).map_err(InputValidationError::new)?;

        let input = Self::deserialize(&value)
            .map_err(|error| InputValidationError::new(vec![SchemaIssue::new("$", error.to_string())]))?;

        input.into_request()
    }

    /// Convert into a domain request, reporting every invalid field.
    pub fn into_request(self) -> Result<AggregationRequest, InputValidationError> {
        let mut issues = Vec::new();

        let ticker = collect(&mut issues, "stocksTicker", Ticker::parse(&self.stocks_ticker));
        let date = self
            .date
            .as_deref()
            .filter(|value| !value.is_empty())
            .and_then(|value| collect(&mut issues, "date", TradeDate::parse(value)));
        let timespan = self
            .timespan
            .as_deref()
            .filter(|value| !value.is_empty())
            .and_then(|value| collect(&mut issues, "timespan", Timespan::from_str(value)));
        let from = self
            .from
            .as_deref()
            .filter(|value| !value.is_empty())
            .and_then(|value| collect(&mut issues, "from", RangeBound::parse(value)));
        let to = self
            .to
            .as_deref()
            .filter(|value| !value.is_empty())
            .and_then(|value| collect(&mut issues, "to", RangeBound::parse(value)));
        let sort = self
            .sort
            .as_deref()
            .filter(|value| !value.is_empty())
            .and_then(|value| collect(&mut issues, "sort", SortOrder::from_str(value)));

        if self.multiplier == Some(0) {
            issues.push(issue("multiplier", ValidationError::NonPositive { field: "multiplier" }));
        }
        if self.limit == Some(0) {
            issues.push(issue("limit", ValidationError::NonPositive { field: "limit" }));
        }

        let snapshot = SnapshotFlags {
            include_last_quote: self.include_last_quote.unwrap_or(false),
            include_last_trade: self.include_last_trade.unwrap_or(false),
            include_prev_day: self.include_prev_day.unwrap_or(false),
            include_min: self.include_min.unwrap_or(false),
        };

        let (Some(ticker), true) = (ticker, issues.is_empty()) else {
            return Err(InputValidationError::new(issues));
        };

        let mut request = AggregationRequest::new(ticker).with_snapshot_flags(snapshot);
        if let Some(date) = date {
            request = request.with_date(date);
        }

        // A partial window is not an error; aggregates are simply not requested.
        if let (Some(multiplier), Some(timespan), Some(from), Some(to)) =
            (self.multiplier, timespan, from, to)
        {
            let range = AggregateRange::new(multiplier, timespan, from, to)
                .and_then(|range| match self.limit {
                    Some(limit) => range.with_limit(limit),
                    None => Ok(range),
                })
                .map_err(|error| {
                    let field = match &error {
                        ValidationError::NonPositive { field } => *field,
                        _ => "multiplier",
                    };
                    InputValidationError::new(vec![issue(field, error)])
                })?
                .with_adjusted(self.adjusted.unwrap_or(true))
                .with_sort(sort.unwrap_or_default());
            request = request.with_range(range);
        }

        Ok(request)
    }
}

/// Optional string fields where `""` means "not given".
const BLANK_MEANS_ABSENT: [&str; 5] = ["date", "timespan", "from", "to", "sort"];

fn without_blank_optionals(value: &Value) -> Value {
    let mut value = value.clone();
    if let Some(fields) = value.as_object_mut() {
        fields.retain(|key, field| {
            !(BLANK_MEANS_ABSENT.contains(&key.as_str()) && field.as_str() == Some(""))
        });
    }
    value
}

fn collect<T>(
    issues: &mut Vec<SchemaIssue>,
    field: &str,
    result: Result<T, ValidationError>,
) -> Option<T> {
    result.map_err(|error| issues.push(issue(field, error))).ok()
}

fn issue(field: &str, error: ValidationError) -> SchemaIssue {
    SchemaIssue::field(field, error.to_string())
}
