//! # Input Schema
//!
//! The tool's input is declared as a JSON schema value (returned by
//! `describe`) and checked with a small validator that understands the
//! keywords the schema uses: `type`, `required`, `properties`, `minLength`,
//! `minimum` and `enum`. All problems are collected, not just the first.

use std::fmt::{Display, Formatter};

use polyfetch_core::{SortOrder, Timespan};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// One schema violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaIssue {
    /// JSON-pointer-like path of the offending field (`$/stocksTicker`).
    pub path: String,
    pub message: String,
}

impl SchemaIssue {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn field(field: &str, message: impl Into<String>) -> Self {
        Self::new(format!("$/{field}"), message)
    }
}

impl Display for SchemaIssue {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.path, self.message)
    }
}

/// The single structured error returned when an invocation input is malformed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputValidationError {
    pub issues: Vec<SchemaIssue>,
}

impl InputValidationError {
    pub fn new(issues: Vec<SchemaIssue>) -> Self {
        Self { issues }
    }

    pub fn mentions(&self, field: &str) -> bool {
        let path = format!("$/{field}");
        self.issues.iter().any(|issue| issue.path == path)
    }
}

impl Display for InputValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let issues = serde_json::to_string(&self.issues).map_err(|_| std::fmt::Error)?;
        write!(f, "Validation failed: {issues}")
    }
}

impl std::error::Error for InputValidationError {}

/// JSON schema of the invocation input.
pub fn input_schema() -> Value {
    let timespans = Timespan::ALL
        .iter()
        .map(|timespan| timespan.as_str())
        .collect::<Vec<_>>();
    let sorts = [SortOrder::Asc.as_str(), SortOrder::Desc.as_str()];

    json!({
        "type": "object",
        "properties": {
            "stocksTicker": {
                "type": "string",
                "minLength": 1,
                "description": "Specify a case-sensitive stock ticker symbol."
            },
            "date": {
                "type": "string",
                "description": "Only for specific dates. The date of the requested open/close in the format YYYY-MM-DD. Defaults to the current date and can be omitted."
            },
            "includeLastQuote": { "type": "boolean", "description": "Include the last quote in the snapshot." },
            "includeLastTrade": { "type": "boolean", "description": "Include the last trade in the snapshot." },
            "includePrevDay": { "type": "boolean", "description": "Include the previous day's bar in the snapshot." },
            "includeMin": { "type": "boolean", "description": "Include the most recent minute bar in the snapshot." },
            "multiplier": {
                "type": "integer",
                "minimum": 1,
                "description": "Size of the aggregate timespan multiplier. Aggregates are fetched only when multiplier, timespan, from and to are all given."
            },
            "timespan": { "type": "string", "enum": timespans, "description": "Size of the aggregate time window." },
            "from": { "type": "string", "description": "Start of the aggregate window (YYYY-MM-DD or millisecond timestamp)." },
            "to": { "type": "string", "description": "End of the aggregate window (YYYY-MM-DD or millisecond timestamp)." },
            "adjusted": { "type": "boolean", "description": "Whether aggregates are adjusted for splits. Defaults to true." },
            "sort": { "type": "string", "enum": sorts, "description": "Sort aggregates by timestamp. Defaults to asc." },
            "limit": { "type": "integer", "minimum": 1, "description": "Maximum number of base aggregates. Defaults to 5000." }
        },
        "required": ["stocksTicker"]
    })
}

/// Validate `value` against `schema`, returning every violation found.
pub fn validate_against_schema(value: &Value, schema: &Value) -> Result<(), Vec<SchemaIssue>> {
    let Some(schema_obj) = schema.as_object() else {
        return Err(vec![SchemaIssue::new("$", "schema must be an object")]);
    };

    let mut issues = Vec::new();
    validate_value(value, schema_obj, "$", &mut issues);
    if issues.is_empty() {
        Ok(())
    } else {
        Err(issues)
    }
}

fn validate_value(
    value: &Value,
    schema: &Map<String, Value>,
    path: &str,
    issues: &mut Vec<SchemaIssue>,
) {
    if let Some(schema_type) = schema.get("type").and_then(Value::as_str) {
        if !type_matches(schema_type, value) {
            issues.push(SchemaIssue::new(
                path,
                format!(
                    "expected type '{}', found '{}'",
                    schema_type,
                    value_type_name(value)
                ),
            ));
            // Nested keywords are meaningless once the type is wrong.
            return;
        }
    }

    if let (Some(required), Value::Object(obj)) = (schema.get("required"), value) {
        for field in required.as_array().into_iter().flatten().filter_map(Value::as_str) {
            if !obj.contains_key(field) {
                issues.push(SchemaIssue::new(
                    format!("{path}/{field}"),
                    format!("required field '{field}' is missing"),
                ));
            }
        }
    }

    if let (Some(Value::Object(properties)), Value::Object(obj)) = (schema.get("properties"), value) {
        for (key, prop_schema) in properties {
            if let (Some(prop_value), Some(prop_schema)) = (obj.get(key), prop_schema.as_object()) {
                validate_value(prop_value, prop_schema, &format!("{path}/{key}"), issues);
            }
        }
    }

    if let (Some(min_length), Value::String(s)) = (schema.get("minLength").and_then(Value::as_u64), value) {
        let length = s.chars().count() as u64;
        if length < min_length {
            issues.push(SchemaIssue::new(
                path,
                format!("string must have at least {min_length} characters, found {length}"),
            ));
        }
    }

    if let (Some(minimum), Value::Number(n)) = (schema.get("minimum").and_then(Value::as_f64), value) {
        if n.as_f64().is_some_and(|n| n < minimum) {
            issues.push(SchemaIssue::new(
                path,
                format!("number must be greater than or equal to {minimum}, found {n}"),
            ));
        }
    }

    if let Some(Value::Array(allowed)) = schema.get("enum") {
        if !allowed.contains(value) {
            let allowed = allowed
                .iter()
                .map(Value::to_string)
                .collect::<Vec<_>>()
                .join(", ");
            issues.push(SchemaIssue::new(
                path,
                format!("value {value} is not one of [{allowed}]"),
            ));
        }
    }
}

fn type_matches(schema_type: &str, value: &Value) -> bool {
    match (schema_type, value) {
        ("object", Value::Object(_)) => true,
        ("array", Value::Array(_)) => true,
        ("string", Value::String(_)) => true,
        ("integer", Value::Number(n)) => n.is_i64() || n.is_u64(),
        ("number", Value::Number(_)) => true,
        ("boolean", Value::Bool(_)) => true,
        ("null", Value::Null) => true,
        _ => false,
    }
}

fn value_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
