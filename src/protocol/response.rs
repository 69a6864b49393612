use serde::Serialize;
use serde_json::json;

use super::request::RpcId;
use crate::dispatch::DispatchError;
use crate::registry::{Content, ResourceInfo, ToolInfo};

// ---------------------------------------------------------------------------
// JSON-RPC 2.0 response layer
// ---------------------------------------------------------------------------

/// JSON-RPC 2.0 response envelope.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcResponse {
    pub jsonrpc: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<RpcId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<JsonRpcError>,
}

impl JsonRpcResponse {
    pub fn success(id: Option<RpcId>, result: serde_json::Value) -> Self {
        Self {
            jsonrpc: "2.0".into(),
            id,
            result: Some(result),
            error: None,
        }
    }

    pub fn error(id: Option<RpcId>, error: JsonRpcError) -> Self {
        Self {
            jsonrpc: "2.0".into(),
            id,
            result: None,
            error: Some(error),
        }
    }
}

/// JSON-RPC 2.0 error object.
#[derive(Debug, Clone, Serialize)]
pub struct JsonRpcError {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl JsonRpcError {
    pub fn parse_error() -> Self {
        Self { code: -32700, message: "Parse error".into(), data: None }
    }

    pub fn invalid_request() -> Self {
        Self { code: -32600, message: "Invalid Request".into(), data: None }
    }

    pub fn invalid_request_with(detail: impl Into<String>) -> Self {
        Self { code: -32600, message: detail.into(), data: None }
    }

    pub fn method_not_found(method: &str) -> Self {
        Self {
            code: -32601,
            message: format!("Method not found: {method}"),
            data: None,
        }
    }

    pub fn invalid_params(detail: impl Into<String>) -> Self {
        Self { code: -32602, message: detail.into(), data: None }
    }

    pub fn internal_error(detail: impl Into<String>) -> Self {
        Self { code: -32603, message: detail.into(), data: None }
    }
}

/// Map the dispatch failure taxonomy onto wire errors.
///
/// The JSON-RPC `message` is the human-readable failure; `data` carries a
/// machine-readable code plus structured details so clients need not parse
/// the message. `InvalidArguments` enumerates every violated field in one
/// combined message.
impl From<DispatchError> for JsonRpcError {
    fn from(err: DispatchError) -> Self {
        let (code, kind, details) = match &err {
            DispatchError::UnknownTool(name) => (-32602, "unknown_tool", json!({ "name": name })),
            DispatchError::UnknownResource(uri) => {
                (-32002, "unknown_resource", json!({ "uri": uri }))
            }
            DispatchError::InvalidArguments(fields) => {
                let fields: Vec<serde_json::Value> = fields
                    .iter()
                    .map(|f| json!({ "path": f.path, "message": f.message }))
                    .collect();
                (-32602, "invalid_arguments", json!({ "fields": fields }))
            }
            DispatchError::Handler(_) => (-32603, "handler_error", json!({})),
        };

        Self {
            code,
            message: err.to_string(),
            data: Some(json!({ "code": kind, "details": details })),
        }
    }
}

// ---------------------------------------------------------------------------
// MCP result layer (returned inside a *successful* JSON-RPC response)
// ---------------------------------------------------------------------------

/// `tools/list` result.
#[derive(Debug, Clone, Serialize)]
pub struct ListToolsResult {
    pub tools: Vec<ToolInfo>,
}

/// `resources/list` result.
#[derive(Debug, Clone, Serialize)]
pub struct ListResourcesResult {
    pub resources: Vec<ResourceInfo>,
}

/// MCP tool call result wrapper.
#[derive(Debug, Clone, Serialize)]
pub struct ToolResult {
    pub content: Vec<ToolResultContent>,
    #[serde(rename = "isError", skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
}

/// A single content block inside a tool result.
#[derive(Debug, Clone, Serialize)]
pub struct ToolResultContent {
    #[serde(rename = "type")]
    pub content_type: String,
    pub text: String,
}

impl ToolResult {
    pub fn from_contents(contents: Vec<Content>) -> Self {
        Self {
            content: contents
                .into_iter()
                .map(|content| ToolResultContent {
                    content_type: "text".into(),
                    text: content.text,
                })
                .collect(),
            is_error: false,
        }
    }
}

/// `resources/read` result.
#[derive(Debug, Clone, Serialize)]
pub struct ReadResourceResult {
    pub contents: Vec<ResourceContent>,
}

/// A single content block inside a resource read result, tagged with the
/// originating uri.
#[derive(Debug, Clone, Serialize)]
pub struct ResourceContent {
    pub uri: String,
    #[serde(rename = "mimeType", skip_serializing_if = "Option::is_none")]
    pub mime_type: Option<String>,
    pub text: String,
}

impl ReadResourceResult {
    pub fn from_contents(contents: Vec<Content>) -> Self {
        Self {
            contents: contents
                .into_iter()
                .map(|content| ResourceContent {
                    uri: content.uri.unwrap_or_default(),
                    mime_type: content.mime_type,
                    text: content.text,
                })
                .collect(),
        }
    }
}
