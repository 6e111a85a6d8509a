//! CLI argument definitions for polyfetch.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `describe` | Print the tool description (name, description, input schema) |
//! | `invoke` | Run the tool with a raw JSON invocation input |
//! | `fetch` | Build the invocation input from flags and run the tool |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--api-key` | `$POLYGON_API_KEY` | Polygon.io API key |
//! | `--base-url` | `$POLYGON_BASE_URL` or `https://api.polygon.io` | Provider base URL |
//! | `--table` | `false` | Render aggregate bars as a text table |
//! | `--pretty` | `false` | Pretty-print JSON output |
//!
//! # Examples
//!
//! ```bash
//! polyfetch fetch AAPL --date 2024-01-05
//! polyfetch fetch AAPL --multiplier 1 --timespan day --from 2024-01-01 --to 2024-01-31 --table
//! echo '{"stocksTicker":"MSFT"}' | polyfetch invoke --pretty
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use polyfetch_agent::LookupKey;
use polyfetch_core::{SortOrder, Timespan};
use serde_json::{Map, Value};

/// Aggregated Polygon.io market data for one ticker.
#[derive(Debug, Parser)]
#[command(
    name = "polyfetch",
    author,
    version,
    about = "Aggregated Polygon.io market data for one ticker",
    long_about = "polyfetch runs the polygon_data_fetcher tool: the daily open/close, previous \
close, live snapshot and optional aggregate bars for one ticker, each lookup reporting its own \
result or error.\n\nUse 'polyfetch <command> --help' for command-specific help."
)]
pub struct Cli {
    /// Polygon.io API key; falls back to POLYGON_API_KEY.
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    /// Provider base URL; falls back to POLYGON_BASE_URL.
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Render aggregate bars as a text table instead of raw JSON.
    #[arg(long, global = true, default_value_t = false)]
    pub table: bool,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the tool description and input schema.
    Describe,
    /// Run the tool with a JSON invocation input.
    Invoke(InvokeArgs),
    /// Build the invocation input from flags and run the tool.
    Fetch(FetchArgs),
}

#[derive(Debug, Args)]
pub struct InvokeArgs {
    /// File holding the invocation JSON; `-` or omitted reads stdin.
    #[arg(long, short = 'i')]
    pub input: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct FetchArgs {
    /// Case-sensitive ticker symbol.
    pub ticker: String,

    /// Date of the daily open/close (YYYY-MM-DD); defaults to today.
    #[arg(long)]
    pub date: Option<String>,

    #[arg(long, default_value_t = false)]
    pub include_last_quote: bool,

    #[arg(long, default_value_t = false)]
    pub include_last_trade: bool,

    #[arg(long, default_value_t = false)]
    pub include_prev_day: bool,

    #[arg(long, default_value_t = false)]
    pub include_min: bool,

    /// Aggregate timespan multiplier.
    #[arg(long)]
    pub multiplier: Option<u32>,

    #[arg(long, value_enum)]
    pub timespan: Option<TimespanArg>,

    /// Start of the aggregate window (YYYY-MM-DD or epoch milliseconds).
    #[arg(long)]
    pub from: Option<String>,

    /// End of the aggregate window (YYYY-MM-DD or epoch milliseconds).
    #[arg(long)]
    pub to: Option<String>,

    /// Adjust aggregates for splits.
    #[arg(long)]
    pub adjusted: Option<bool>,

    #[arg(long, value_enum)]
    pub sort: Option<SortArg>,

    /// Maximum number of base aggregates.
    #[arg(long)]
    pub limit: Option<u32>,

    /// Run a single lookup instead of all applicable ones.
    #[arg(long, value_parser = parse_lookup)]
    pub only: Option<LookupKey>,
}

impl FetchArgs {
    /// Invocation input equivalent to these flags; unset flags are left out.
    pub fn to_input(&self) -> Value {
        let mut input = Map::new();
        input.insert(String::from("stocksTicker"), Value::from(self.ticker.as_str()));

        let optional = [
            ("date", self.date.as_deref().map(Value::from)),
            ("includeLastQuote", flag(self.include_last_quote)),
            ("includeLastTrade", flag(self.include_last_trade)),
            ("includePrevDay", flag(self.include_prev_day)),
            ("includeMin", flag(self.include_min)),
            ("multiplier", self.multiplier.map(Value::from)),
            (
                "timespan",
                self.timespan.map(|timespan| Value::from(Timespan::from(timespan).as_str())),
            ),
            ("from", self.from.as_deref().map(Value::from)),
            ("to", self.to.as_deref().map(Value::from)),
            ("adjusted", self.adjusted.map(Value::from)),
            ("sort", self.sort.map(|sort| Value::from(SortOrder::from(sort).as_str()))),
            ("limit", self.limit.map(Value::from)),
        ];
        for (key, value) in optional {
            if let Some(value) = value {
                input.insert(String::from(key), value);
            }
        }

        Value::Object(input)
    }
}

fn flag(set: bool) -> Option<Value> {
    set.then_some(Value::Bool(true))
}

fn parse_lookup(value: &str) -> Result<LookupKey, String> {
    value.parse()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TimespanArg {
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Quarter,
    Year,
}

impl From<TimespanArg> for Timespan {
    fn from(value: TimespanArg) -> Self {
        match value {
            TimespanArg::Minute => Self::Minute,
            TimespanArg::Hour => Self::Hour,
            TimespanArg::Day => Self::Day,
            TimespanArg::Week => Self::Week,
            TimespanArg::Month => Self::Month,
            TimespanArg::Quarter => Self::Quarter,
            TimespanArg::Year => Self::Year,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortArg {
    Asc,
    Desc,
}

impl From<SortArg> for SortOrder {
    fn from(value: SortArg) -> Self {
        match value {
            SortArg::Asc => Self::Asc,
            SortArg::Desc => Self::Desc,
        }
    }
}
