//! Text table rendering of aggregate bars.
//!
//! Each provider bar becomes one row; columns are fixed as
//! volume, VWAP, open, close, high, low, timestamp, transactions.

use std::fmt::{Display, Formatter};

use serde::Deserialize;
use serde_json::Value;
use time::macros::format_description;
use time::OffsetDateTime;

use crate::clock::Clock;

const HEADER: [&str; 8] = [
    "Volume",
    "VWAP",
    "Open",
    "Close",
    "High",
    "Low",
    "Timestamp",
    "Transactions",
];

/// Raw aggregate bar as returned by `/v2/aggs/.../range/...`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
struct RawBar {
    v: Option<f64>,
    vw: Option<f64>,
    o: Option<f64>,
    c: Option<f64>,
    h: Option<f64>,
    l: Option<f64>,
    t: Option<i64>,
    n: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct AggregatesPayload {
    #[serde(default)]
    results: Option<Vec<RawBar>>,
}

/// One rendered bar.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub volume: Option<f64>,
    pub vwap: Option<f64>,
    pub open: Option<f64>,
    pub close: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub timestamp: String,
    pub transactions: Option<u64>,
}

impl TableRow {
    fn cells(&self) -> [String; 8] {
        [
            number_cell(self.volume),
            number_cell(self.vwap),
            number_cell(self.open),
            number_cell(self.close),
            number_cell(self.high),
            number_cell(self.low),
            self.timestamp.clone(),
            self.transactions.map(|n| n.to_string()).unwrap_or_default(),
        ]
    }
}

/// Aggregate bars as an ordered table; rows match provider bars 1:1.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedTable {
    rows: Vec<TableRow>,
}

#[derive(Debug, thiserror::Error)]
#[error("aggregate payload has an unexpected shape: {0}")]
pub struct TableError(#[from] serde_json::Error);

impl RenderedTable {
    /// Build from the raw provider payload, formatting each timestamp in the
    /// offset `clock` reports for that bar's instant.
    ///
    /// A payload without `results` (no bars in the window) yields an empty table.
    pub fn from_payload(payload: &Value, clock: &dyn Clock) -> Result<Self, TableError> {
        let payload = AggregatesPayload::deserialize(payload)?;
        let rows = payload
            .results
            .unwrap_or_default()
            .into_iter()
            .map(|bar| TableRow {
                volume: bar.v,
                vwap: bar.vw,
                open: bar.o,
                close: bar.c,
                high: bar.h,
                low: bar.l,
                timestamp: bar
                    .t
                    .map(|millis| format_timestamp(millis, clock))
                    .unwrap_or_default(),
                transactions: bar.n,
            })
            .collect();

        Ok(Self { rows })
    }

    pub fn rows(&self) -> &[TableRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl Display for RenderedTable {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "| {} |", HEADER.join(" | "))?;
        write!(f, "|{}", "---|".repeat(HEADER.len()))?;
        for row in &self.rows {
            write!(f, "\n| {} |", row.cells().join(" | "))?;
        }
        Ok(())
    }
}

/// `M/D/YYYY, h:mm:ss AM` in the local offset at that instant; falls back to the raw value
/// when out of range.
pub fn format_timestamp(epoch_millis: i64, clock: &dyn Clock) -> String {
    let format = format_description!(
        "[month padding:none]/[day padding:none]/[year], [hour repr:12 padding:none]:[minute]:[second] [period]"
    );

    OffsetDateTime::from_unix_timestamp_nanos(i128::from(epoch_millis) * 1_000_000)
        .ok()
        .and_then(|instant| instant.to_offset(clock.offset_at(instant)).format(format).ok())
        .unwrap_or_else(|| epoch_millis.to_string())
}

fn number_cell(value: Option<f64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use serde_json::json;
    use time::macros::datetime;
    use time::UtcOffset;

    const UTC: FixedClock = FixedClock(datetime!(2024-03-07 12:00 UTC));

    /// New York rules for 2024: EDT from 10 March 07:00 UTC to 3 November 06:00 UTC.
    struct NewYork2024;

    impl Clock for NewYork2024 {
        fn now(&self) -> OffsetDateTime {
            datetime!(2024-10-18 09:00 -04:00)
        }

        fn offset_at(&self, instant: OffsetDateTime) -> UtcOffset {
            let daylight = instant >= datetime!(2024-03-10 07:00 UTC)
                && instant < datetime!(2024-11-03 06:00 UTC);
            let hours = if daylight { -4 } else { -5 };
            UtcOffset::from_hms(hours, 0, 0).expect("valid offset")
        }
    }

    fn two_bar_payload() -> Value {
        json!({
            "ticker": "AAPL",
            "resultsCount": 2,
            "results": [
                { "v": 82488674.0, "vw": 184.3608, "o": 187.15, "c": 185.64, "h": 188.44, "l": 183.885, "t": 1704171600000_i64, "n": 1008871 },
                { "v": 58414460.0, "vw": 184.9707, "o": 184.22, "c": 184.25, "h": 185.88, "l": 183.43, "t": 1704258000000_i64, "n": 656853 }
            ]
        })
    }

    #[test]
    fn renders_two_header_lines_plus_one_row_per_bar() {
        let table = RenderedTable::from_payload(&two_bar_payload(), &UTC)
            .expect("payload should render");
        let text = table.to_string();
        let lines = text.lines().collect::<Vec<_>>();

        assert_eq!(table.len(), 2);
        assert_eq!(lines.len(), 4);
        assert_eq!(
            lines[0],
            "| Volume | VWAP | Open | Close | High | Low | Timestamp | Transactions |"
        );
        assert_eq!(lines[1], "|---|---|---|---|---|---|---|---|");
        assert_eq!(
            lines[2],
            "| 82488674 | 184.3608 | 187.15 | 185.64 | 188.44 | 183.885 | 1/2/2024, 5:00:00 AM | 1008871 |"
        );
    }

    #[test]
    fn preserves_provider_order() {
        let table = RenderedTable::from_payload(&two_bar_payload(), &UTC)
            .expect("payload should render");
        let opens = table.rows().iter().map(|row| row.open).collect::<Vec<_>>();
        assert_eq!(opens, vec![Some(187.15), Some(184.22)]);
    }

    #[test]
    fn timestamps_follow_the_clock_offset() {
        let new_york = FixedClock(datetime!(2024-01-02 09:00 -05:00));
        assert_eq!(format_timestamp(1704171600000, &new_york), "1/2/2024, 12:00:00 AM");
        assert_eq!(format_timestamp(1704216600000, &UTC), "1/2/2024, 5:30:00 PM");
    }

    #[test]
    fn each_bar_uses_the_offset_in_force_at_its_instant() {
        let payload = json!({
            "results": [
                { "t": 1704171600000_i64 },
                { "t": 1719806400000_i64 }
            ]
        });
        let table =
            RenderedTable::from_payload(&payload, &NewYork2024).expect("payload should render");

        let stamps = table
            .rows()
            .iter()
            .map(|row| row.timestamp.as_str())
            .collect::<Vec<_>>();
        assert_eq!(stamps, vec!["1/2/2024, 12:00:00 AM", "7/1/2024, 12:00:00 AM"]);
    }

    #[test]
    fn missing_results_render_header_only() {
        let table = RenderedTable::from_payload(
            &json!({ "ticker": "AAPL", "resultsCount": 0, "status": "OK" }),
            &UTC,
        )
        .expect("payload should render");

        assert!(table.is_empty());
        assert_eq!(table.to_string().lines().count(), 2);
    }

    #[test]
    fn missing_bar_fields_become_empty_cells() {
        let table = RenderedTable::from_payload(
            &json!({ "results": [ { "o": 1.5, "c": 2.0 } ] }),
            &UTC,
        )
        .expect("payload should render");

        let text = table.to_string();
        assert_eq!(text.lines().nth(2), Some("|  |  | 1.5 | 2 |  |  |  |  |"));
    }

    #[test]
    fn non_array_results_are_rejected() {
        let error = RenderedTable::from_payload(&json!({ "results": "nope" }), &UTC)
            .expect_err("must fail");
        assert!(error.to_string().contains("unexpected shape"));
    }
}
