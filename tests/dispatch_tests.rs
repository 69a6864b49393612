//! Integration tests for the dispatcher over the built-in registries.
//!
//! Tests exercise the full dispatch flow: registry resolution, schema
//! validation, handler invocation, and error normalization.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use serde_json::{Map, Value};

use mcp_sample_server::config::ServerConfig;
use mcp_sample_server::dispatch::{DispatchError, Dispatcher, Request, Response};
use mcp_sample_server::handlers;
use mcp_sample_server::registry::{Content, ResourceRegistry, ToolRegistry};
use mcp_sample_server::schema::ToolSchema;

fn dispatcher() -> Dispatcher {
    dispatcher_with(false)
}

fn dispatcher_with(strict_arguments: bool) -> Dispatcher {
    let config = ServerConfig { strict_arguments };
    let (tools, resources) = handlers::build_registries(&config).unwrap();
    Dispatcher::new(tools, resources)
}

fn args(value: Value) -> Option<Map<String, Value>> {
    match value {
        Value::Object(map) => Some(map),
        other => panic!("expected JSON object, got {other}"),
    }
}

async fn call(
    dispatcher: &Dispatcher,
    name: &str,
    arguments: Value,
) -> Result<Response, DispatchError> {
    dispatcher
        .handle(Request::CallTool {
            name: name.to_string(),
            arguments: args(arguments),
        })
        .await
}

fn tool_text(response: Response) -> String {
    match response {
        Response::ToolOutput(contents) => {
            assert_eq!(contents.len(), 1, "sample tools emit one content block");
            contents[0].text.clone()
        }
        other => panic!("expected tool output, got {other:?}"),
    }
}

fn resource_contents(response: Response) -> Vec<Content> {
    match response {
        Response::ResourceContents(contents) => contents,
        other => panic!("expected resource contents, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// tools/call
// ---------------------------------------------------------------------------

#[tokio::test]
async fn unknown_tool_is_rejected() {
    let d = dispatcher();
    let err = call(&d, "nonexistent", serde_json::json!({}))
        .await
        .expect_err("unknown tool must fail");

    match err {
        DispatchError::UnknownTool(name) => assert_eq!(name, "nonexistent"),
        other => panic!("expected UnknownTool, got {other:?}"),
    }
}

#[tokio::test]
async fn echo_round_trips_text() {
    let d = dispatcher();
    let response = call(&d, "echo", serde_json::json!({"text": "hi"}))
        .await
        .unwrap();
    assert_eq!(tool_text(response), "Echo: hi");
}

#[tokio::test]
async fn add_numbers_produces_exact_sum_text() {
    let d = dispatcher();
    let response = call(&d, "add_numbers", serde_json::json!({"a": 2, "b": 3}))
        .await
        .unwrap();
    assert_eq!(tool_text(response), "Result: 2 + 3 = 5");
}

#[tokio::test]
async fn add_numbers_missing_fields_reported_together() {
    let d = dispatcher();
    let err = call(&d, "add_numbers", serde_json::json!({}))
        .await
        .expect_err("missing required fields must fail");

    match err {
        DispatchError::InvalidArguments(fields) => {
            let paths: Vec<&str> = fields.iter().map(|f| f.path.as_str()).collect();
            assert!(paths.contains(&"a"), "must name field a, got {paths:?}");
            assert!(paths.contains(&"b"), "must name field b, got {paths:?}");
        }
        other => panic!("expected InvalidArguments, got {other:?}"),
    }
}

#[tokio::test]
async fn add_numbers_rejects_string_without_coercion() {
    let d = dispatcher();
    let err = call(&d, "add_numbers", serde_json::json!({"a": "2", "b": 3}))
        .await
        .expect_err("string where number is declared must fail");

    match err {
        DispatchError::InvalidArguments(fields) => {
            assert!(
                fields.iter().any(|f| f.path == "a"),
                "must name the mistyped field, got {fields}"
            );
        }
        other => panic!("expected InvalidArguments, got {other:?}"),
    }
}

#[tokio::test]
async fn validate_email_rejects_malformed_address() {
    let d = dispatcher();
    let err = call(&d, "validate_email", serde_json::json!({"email": "not-an-email"}))
        .await
        .expect_err("malformed address must fail");

    match err {
        DispatchError::InvalidArguments(fields) => {
            assert!(
                fields.iter().any(|f| f.path == "email"),
                "must name field email, got {fields}"
            );
        }
        other => panic!("expected InvalidArguments, got {other:?}"),
    }
}

#[tokio::test]
async fn validate_email_accepts_plausible_address() {
    let d = dispatcher();
    let response = call(&d, "validate_email", serde_json::json!({"email": "a@b.com"}))
        .await
        .unwrap();
    assert!(
        tool_text(response).contains("a@b.com"),
        "success content must carry the validated address"
    );
}

#[tokio::test]
async fn get_system_info_accepts_empty_arguments() {
    let d = dispatcher();
    let response = call(&d, "get_system_info", serde_json::json!({}))
        .await
        .unwrap();
    let text = tool_text(response);
    assert!(text.contains(std::env::consts::OS));
    assert!(text.contains(std::env::consts::ARCH));
}

#[tokio::test]
async fn absent_arguments_validate_against_empty_schema() {
    let d = dispatcher_with(true);
    let response = d
        .handle(Request::CallTool {
            name: "get_system_info".to_string(),
            arguments: None,
        })
        .await
        .unwrap();
    assert!(matches!(response, Response::ToolOutput(_)));
}

#[tokio::test]
async fn stray_fields_tolerated_by_default() {
    let d = dispatcher();
    let response = call(&d, "get_system_info", serde_json::json!({"extra": 1}))
        .await
        .unwrap();
    assert!(matches!(response, Response::ToolOutput(_)));
}

#[tokio::test]
async fn strict_mode_rejects_stray_fields() {
    let d = dispatcher_with(true);
    let err = call(&d, "get_system_info", serde_json::json!({"extra": 1}))
        .await
        .expect_err("strict mode must reject undeclared fields");
    assert!(matches!(err, DispatchError::InvalidArguments(_)));
}

#[tokio::test]
async fn handler_invoked_exactly_once_per_call() {
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);

    let mut tools = ToolRegistry::new(false);
    tools
        .register("probe", "Counts invocations", ToolSchema::new(), move |_args| {
            let counter = Arc::clone(&counter);
            Box::pin(async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(vec![Content::text("ok")])
            })
        })
        .unwrap();

    let d = Dispatcher::new(tools, ResourceRegistry::new());
    call(&d, "probe", serde_json::json!({})).await.unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn handler_failure_passes_through_unchanged() {
    let mut tools = ToolRegistry::new(false);
    tools
        .register("broken", "Always fails", ToolSchema::new(), |_args| {
            Box::pin(async {
                Err(mcp_sample_server::registry::HandlerError::new(
                    "downstream unavailable",
                ))
            })
        })
        .unwrap();

    let d = Dispatcher::new(tools, ResourceRegistry::new());
    let err = call(&d, "broken", serde_json::json!({}))
        .await
        .expect_err("handler failure must surface");

    match err {
        DispatchError::Handler(inner) => {
            assert_eq!(inner.to_string(), "downstream unavailable");
        }
        other => panic!("expected Handler, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// tools/list
// ---------------------------------------------------------------------------

#[tokio::test]
async fn list_tools_is_sorted_and_idempotent() {
    let d = dispatcher();

    let first = d.handle(Request::ListTools).await.unwrap();
    // A tool call in between must not perturb the listing.
    call(&d, "echo", serde_json::json!({"text": "x"})).await.unwrap();
    let second = d.handle(Request::ListTools).await.unwrap();

    assert_eq!(first, second, "listing must be free of hidden mutation");

    let Response::Tools(tools) = first else {
        panic!("expected tool listing");
    };
    let names: Vec<&str> = tools.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["add_numbers", "echo", "get_system_info", "validate_email"]
    );
}

#[tokio::test]
async fn every_listed_tool_resolves_and_accepts_minimal_args() {
    let d = dispatcher();
    let Response::Tools(tools) = d.handle(Request::ListTools).await.unwrap() else {
        panic!("expected tool listing");
    };

    for tool in tools {
        let minimal = match tool.name.as_str() {
            "echo" => serde_json::json!({"text": "t"}),
            "add_numbers" => serde_json::json!({"a": 0, "b": 0}),
            "get_system_info" => serde_json::json!({}),
            "validate_email" => serde_json::json!({"email": "a@b.com"}),
            other => panic!("unexpected built-in tool {other}"),
        };
        let response = call(&d, &tool.name, minimal).await.unwrap();
        assert!(matches!(response, Response::ToolOutput(_)), "{} failed", tool.name);
    }
}

// ---------------------------------------------------------------------------
// resources
// ---------------------------------------------------------------------------

#[tokio::test]
async fn list_resources_is_sorted_by_uri() {
    let d = dispatcher();
    let Response::Resources(resources) = d.handle(Request::ListResources).await.unwrap() else {
        panic!("expected resource listing");
    };

    let uris: Vec<&str> = resources.iter().map(|r| r.uri.as_str()).collect();
    assert_eq!(uris, vec!["file://example.json", "file://example.txt"]);
    assert_eq!(resources[0].mime_type, "application/json");
    assert_eq!(resources[1].mime_type, "text/plain");
}

#[tokio::test]
async fn read_example_json_parses_with_version() {
    let d = dispatcher();
    let response = d
        .handle(Request::ReadResource {
            uri: "file://example.json".to_string(),
        })
        .await
        .unwrap();

    let contents = resource_contents(response);
    assert_eq!(contents.len(), 1);
    assert_eq!(contents[0].uri.as_deref(), Some("file://example.json"));
    assert_eq!(contents[0].mime_type.as_deref(), Some("application/json"));

    let value: Value = serde_json::from_str(&contents[0].text).expect("valid JSON");
    assert_eq!(value["version"], "1.0.0");
}

#[tokio::test]
async fn read_example_text_is_materialized_at_read_time() {
    let d = dispatcher();
    let response = d
        .handle(Request::ReadResource {
            uri: "file://example.txt".to_string(),
        })
        .await
        .unwrap();

    let contents = resource_contents(response);
    assert_eq!(contents[0].uri.as_deref(), Some("file://example.txt"));
    assert_eq!(contents[0].mime_type.as_deref(), Some("text/plain"));
    assert!(contents[0].text.contains("Generated at: "));
}

#[tokio::test]
async fn unknown_resource_is_rejected() {
    let d = dispatcher();
    let err = d
        .handle(Request::ReadResource {
            uri: "file://missing".to_string(),
        })
        .await
        .expect_err("unknown resource must fail");

    match err {
        DispatchError::UnknownResource(uri) => assert_eq!(uri, "file://missing"),
        other => panic!("expected UnknownResource, got {other:?}"),
    }
}
