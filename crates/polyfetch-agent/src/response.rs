//! Aggregated response model.

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use polyfetch_core::RemoteCallError;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use serde_json::{json, Value};

/// Name of one lookup slot in the response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LookupKey {
    DailyOpenClose,
    PreviousClose,
    TickerData,
    Aggregates,
}

impl LookupKey {
    /// Assembly order of the response.
    pub const ALL: [Self; 4] = [
        Self::DailyOpenClose,
        Self::PreviousClose,
        Self::TickerData,
        Self::Aggregates,
    ];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::DailyOpenClose => "dailyOpenClose",
            Self::PreviousClose => "previousClose",
            Self::TickerData => "tickerData",
            Self::Aggregates => "aggregates",
        }
    }
}

impl Display for LookupKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LookupKey {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str().eq_ignore_ascii_case(value))
            .ok_or_else(|| {
                format!(
                    "unknown lookup '{value}', expected one of dailyOpenClose, previousClose, tickerData, aggregates"
                )
            })
    }
}

impl Serialize for LookupKey {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

/// Result of one attempted lookup.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupOutcome {
    /// Provider body, passed through untouched.
    Success(Value),
    /// Aggregate bars rendered as a text table.
    Rendered(String),
    Failed {
        message: String,
        cause: RemoteCallError,
    },
}

impl LookupOutcome {
    pub fn failed(cause: RemoteCallError) -> Self {
        Self::Failed {
            message: cause.message(),
            cause,
        }
    }

    pub const fn is_failure(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }

    pub fn error_message(&self) -> Option<&str> {
        match self {
            Self::Failed { message, .. } => Some(message),
            Self::Success(_) | Self::Rendered(_) => None,
        }
    }

    pub fn to_json(&self) -> Value {
        match self {
            Self::Success(value) => value.clone(),
            Self::Rendered(table) => Value::String(table.clone()),
            Self::Failed { message, .. } => json!({ "error": message }),
        }
    }
}

impl Serialize for LookupOutcome {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Success(value) => value.serialize(serializer),
            Self::Rendered(table) => serializer.serialize_str(table),
            Self::Failed { message, .. } => {
                let mut map = serializer.serialize_map(Some(1))?;
                map.serialize_entry("error", message)?;
                map.end()
            }
        }
    }
}

/// Per-invocation composite result; entries keep assembly order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AggregationResponse {
    entries: Vec<(LookupKey, LookupOutcome)>,
}

impl AggregationResponse {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the outcome for `key`; a new key goes last.
    pub fn insert(&mut self, key: LookupKey, outcome: LookupOutcome) {
        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, slot)) => *slot = outcome,
            None => self.entries.push((key, outcome)),
        }
    }

    pub fn get(&self, key: LookupKey) -> Option<&LookupOutcome> {
        self.entries
            .iter()
            .find(|(existing, _)| *existing == key)
            .map(|(_, outcome)| outcome)
    }

    pub fn contains(&self, key: LookupKey) -> bool {
        self.get(key).is_some()
    }

    pub fn keys(&self) -> Vec<LookupKey> {
        self.entries.iter().map(|(key, _)| *key).collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (LookupKey, &LookupOutcome)> {
        self.entries.iter().map(|(key, outcome)| (*key, outcome))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn failure_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|(_, outcome)| outcome.is_failure())
            .count()
    }
}

impl Serialize for AggregationResponse {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, outcome) in &self.entries {
            map.serialize_entry(key.as_str(), outcome)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_in_assembly_order() {
        let mut response = AggregationResponse::new();
        response.insert(LookupKey::TickerData, LookupOutcome::Success(json!({ "a": 1 })));
        response.insert(
            LookupKey::DailyOpenClose,
            LookupOutcome::failed(RemoteCallError::status(404, "nope")),
        );
        response.insert(LookupKey::Aggregates, LookupOutcome::Rendered(String::from("| x |")));

        let text = serde_json::to_string(&response).expect("response should serialize");
        assert_eq!(
            text,
            r#"{"tickerData":{"a":1},"dailyOpenClose":{"error":"Request failed with status 404: nope"},"aggregates":"| x |"}"#
        );
    }

    #[test]
    fn insert_replaces_existing_slot_in_place() {
        let mut response = AggregationResponse::new();
        response.insert(LookupKey::DailyOpenClose, LookupOutcome::Success(json!(1)));
        response.insert(LookupKey::PreviousClose, LookupOutcome::Success(json!(2)));
        response.insert(LookupKey::DailyOpenClose, LookupOutcome::Success(json!(3)));

        assert_eq!(
            response.keys(),
            vec![LookupKey::DailyOpenClose, LookupKey::PreviousClose]
        );
        assert_eq!(
            response.get(LookupKey::DailyOpenClose),
            Some(&LookupOutcome::Success(json!(3)))
        );
    }

    #[test]
    fn failed_outcome_exposes_message_and_cause() {
        let outcome = LookupOutcome::failed(RemoteCallError::transport("connection reset"));
        assert!(outcome.is_failure());
        assert_eq!(outcome.error_message(), Some("connection reset"));
        assert_eq!(outcome.to_json(), json!({ "error": "connection reset" }));
    }

    #[test]
    fn lookup_keys_parse_case_insensitively() {
        assert_eq!("tickerdata".parse::<LookupKey>(), Ok(LookupKey::TickerData));
        assert!("quotes".parse::<LookupKey>().is_err());
    }
}
