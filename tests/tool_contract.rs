//! Contract tests for the `describe`/`invoke` capability pair.

mod support;

use std::sync::Arc;

use polyfetch_agent::{LookupKey, PolygonDataTool, Tool, ToolError, TOOL_NAME};
use polyfetch_core::{GatewayConfig, SnapshotFlags};
use serde_json::{json, Value};

use support::{tool_with, Call, ScriptedGateway};

// =============================================================================
// describe
// =============================================================================

#[test]
fn describe_advertises_name_and_required_ticker() {
    let tool = tool_with(Arc::new(ScriptedGateway::healthy()));
    let description = tool.describe();

    assert_eq!(description.name, TOOL_NAME);
    assert_eq!(description.name, "polygon_data_fetcher");
    assert!(!description.description.is_empty());
    assert_eq!(description.input_schema["type"], "object");
    assert_eq!(description.input_schema["required"], json!(["stocksTicker"]));
    assert_eq!(
        description.input_schema["properties"]["stocksTicker"]["minLength"],
        1
    );
}

#[test]
fn describe_documents_every_input_field() {
    let tool = tool_with(Arc::new(ScriptedGateway::healthy()));
    let schema = tool.describe().input_schema;
    let properties = schema["properties"]
        .as_object()
        .expect("schema should list properties");

    for field in [
        "stocksTicker",
        "date",
        "includeLastQuote",
        "includeLastTrade",
        "includePrevDay",
        "includeMin",
        "multiplier",
        "timespan",
        "from",
        "to",
        "adjusted",
        "sort",
        "limit",
    ] {
        let description = properties
            .get(field)
            .and_then(|property| property["description"].as_str())
            .unwrap_or_default();
        assert!(!description.is_empty(), "{field} should be described");
    }
}

#[test]
fn description_serializes_with_camel_case_keys() {
    let tool = tool_with(Arc::new(ScriptedGateway::healthy()));
    let value = serde_json::to_value(tool.describe()).expect("description should serialize");

    assert!(value.get("inputSchema").is_some());
    assert_eq!(value["name"], "polygon_data_fetcher");
}

// =============================================================================
// invoke: validation
// =============================================================================

#[tokio::test]
async fn missing_ticker_is_rejected_before_any_call() {
    let gateway = Arc::new(ScriptedGateway::healthy());
    let tool = tool_with(gateway.clone());

    let error = tool
        .invoke(json!({ "date": "2024-01-05" }))
        .await
        .expect_err("missing ticker should be rejected");

    let ToolError::InvalidInput(error) = error else {
        panic!("expected invalid input, got {error:?}");
    };
    assert!(error.mentions("stocksTicker"));
    assert!(gateway.calls().is_empty());
}

#[tokio::test]
async fn empty_ticker_is_rejected_before_any_call() {
    let gateway = Arc::new(ScriptedGateway::healthy());
    let tool = tool_with(gateway.clone());

    let error = tool
        .invoke(json!({ "stocksTicker": "" }))
        .await
        .expect_err("empty ticker should be rejected");

    assert!(matches!(&error, ToolError::InvalidInput(issues) if issues.mentions("stocksTicker")));
    assert!(error.to_string().starts_with("Validation failed: "));
    assert!(gateway.calls().is_empty());
}

#[tokio::test]
async fn all_input_problems_are_reported_together() {
    let gateway = Arc::new(ScriptedGateway::healthy());
    let tool = tool_with(gateway.clone());

    let error = tool
        .run(&json!({
            "stocksTicker": "AAPL",
            "timespan": "fortnight",
            "limit": 0,
            "includeMin": "yes"
        }))
        .await
        .expect_err("malformed input should be rejected");

    let ToolError::InvalidInput(error) = error else {
        panic!("expected invalid input, got {error:?}");
    };
    assert!(error.mentions("timespan"));
    assert!(error.mentions("limit"));
    assert!(error.mentions("includeMin"));
    assert!(gateway.calls().is_empty());
}

#[tokio::test]
async fn malformed_date_is_rejected_before_any_call() {
    let gateway = Arc::new(ScriptedGateway::healthy());
    let tool = tool_with(gateway.clone());

    let error = tool
        .run(&json!({ "stocksTicker": "AAPL", "date": "01/05/2024" }))
        .await
        .expect_err("malformed date should be rejected");

    assert!(matches!(&error, ToolError::InvalidInput(issues) if issues.mentions("date")));
    assert!(gateway.calls().is_empty());
}

#[tokio::test]
async fn non_object_input_is_rejected() {
    let tool = tool_with(Arc::new(ScriptedGateway::healthy()));

    let error = tool
        .invoke(Value::String(String::from("AAPL")))
        .await
        .expect_err("a bare string is not an invocation input");

    assert!(matches!(error, ToolError::InvalidInput(_)));
}

// =============================================================================
// invoke: output
// =============================================================================

#[tokio::test]
async fn invoke_returns_serialized_composite() {
    let tool = tool_with(Arc::new(ScriptedGateway::healthy()));

    let output = tool
        .invoke(json!({ "stocksTicker": "AAPL", "unknownKey": 42 }))
        .await
        .expect("unknown keys are ignored");

    let value: Value = serde_json::from_str(&output).expect("output should be JSON");
    assert_eq!(value["previousClose"]["ticker"], "AAPL");
    assert_eq!(value["tickerData"]["ticker"]["todaysChange"], 0.42);
}

#[tokio::test]
async fn provider_key_order_is_preserved() {
    let tool = tool_with(Arc::new(ScriptedGateway::healthy()));

    let output = tool
        .invoke(json!({ "stocksTicker": "AAPL" }))
        .await
        .expect("invocation should succeed");

    let daily = output
        .find(r#""dailyOpenClose":{"status":"OK","from":"2024-01-05","symbol":"AAPL""#);
    assert!(daily.is_some(), "provider key order changed: {output}");
}

#[tokio::test]
async fn ticker_is_passed_through_case_sensitively() {
    let gateway = Arc::new(ScriptedGateway::healthy());
    let tool = tool_with(gateway.clone());

    tool.run(&json!({ "stocksTicker": "brk.b" }))
        .await
        .expect("invocation should succeed");

    assert!(gateway.calls().contains(&Call::PreviousClose {
        ticker: String::from("brk.b"),
    }));
}

#[tokio::test]
async fn snapshot_flags_reach_the_gateway() {
    let gateway = Arc::new(ScriptedGateway::healthy());
    let tool = tool_with(gateway.clone());

    tool.run(&json!({
        "stocksTicker": "AAPL",
        "includeLastQuote": true,
        "includeMin": true
    }))
    .await
    .expect("invocation should succeed");

    let flags = gateway
        .calls()
        .into_iter()
        .find_map(|call| match call {
            Call::TickerSnapshot { flags, .. } => Some(flags),
            _ => None,
        })
        .expect("snapshot lookup should run");
    assert_eq!(
        flags,
        SnapshotFlags {
            include_last_quote: true,
            include_last_trade: false,
            include_prev_day: false,
            include_min: true,
        }
    );
}

#[tokio::test]
async fn single_lookup_mode_validates_first() {
    let gateway = Arc::new(ScriptedGateway::healthy());
    let tool = tool_with(gateway.clone());

    let result = tool.run_only(&json!({}), LookupKey::PreviousClose).await;

    assert!(matches!(result, Err(ToolError::InvalidInput(_))));
    assert!(gateway.calls().is_empty());
}

// =============================================================================
// construction
// =============================================================================

#[test]
fn empty_credential_is_a_configuration_error() {
    let error = GatewayConfig::new("   ").expect_err("blank key should be rejected");
    assert_eq!(error.to_string(), "missing POLYGON_API_KEY environment variable");
}

#[test]
fn tool_builds_from_explicit_configuration() {
    let config = GatewayConfig::new("test-key").expect("key should be accepted");
    let tool = PolygonDataTool::new(config);
    assert_eq!(tool.describe().name, TOOL_NAME);
}
