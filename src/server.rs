use serde_json::json;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{info, warn};

use crate::dispatch::{Dispatcher, Request, Response};
use crate::protocol::{
    JsonRpcError, JsonRpcRequest, JsonRpcResponse, ListResourcesResult, ListToolsResult,
    ReadResourceParams, ReadResourceResult, ToolCallParams, ToolResult,
};

/// Maximum bytes per JSON-RPC message (1 MiB).
const MAX_MESSAGE_BYTES: usize = 1024 * 1024;

/// MCP protocol revision this server speaks.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// MCP server that communicates over stdio using newline-delimited
/// JSON-RPC 2.0. Owns the physical stream; the dispatcher owns the
/// semantics. Per-request failures become error responses, never process
/// exits.
pub struct McpServer {
    dispatcher: Dispatcher,
    initialized: bool,
}

impl McpServer {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher,
            initialized: false,
        }
    }

    pub async fn run(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        let stdin = tokio::io::stdin();
        let mut stdout = tokio::io::stdout();
        let mut reader = BufReader::new(stdin);
        let mut raw = Vec::new();

        loop {
            raw.clear();
            let n = reader.read_until(b'\n', &mut raw).await?;
            if n == 0 {
                break;
            }

            if n > MAX_MESSAGE_BYTES {
                warn!(bytes = n, limit = MAX_MESSAGE_BYTES, "message too large");
                write_response(
                    &mut stdout,
                    &JsonRpcResponse::error(None, JsonRpcError::parse_error()),
                )
                .await?;
                continue;
            }

            let trimmed = match std::str::from_utf8(&raw) {
                Ok(s) => s.trim(),
                Err(_) => {
                    write_response(
                        &mut stdout,
                        &JsonRpcResponse::error(None, JsonRpcError::parse_error()),
                    )
                    .await?;
                    continue;
                }
            };

            if trimmed.is_empty() {
                continue;
            }

            let req: JsonRpcRequest = match serde_json::from_str(trimmed) {
                Ok(r) => r,
                Err(e) => {
                    warn!(error = %e, "request parse error");
                    write_response(
                        &mut stdout,
                        &JsonRpcResponse::error(None, JsonRpcError::parse_error()),
                    )
                    .await?;
                    continue;
                }
            };

            if let Some(resp) = self.handle_request(&req).await {
                write_response(&mut stdout, &resp).await?;
            }
        }

        Ok(())
    }

    /// Handle one parsed JSON-RPC request: version check, initialization
    /// gate, then method routing.
    ///
    /// Returns `None` for notifications (no response required).
    pub async fn handle_request(&mut self, req: &JsonRpcRequest) -> Option<JsonRpcResponse> {
        if req.jsonrpc != "2.0" {
            return Some(JsonRpcResponse::error(
                req.id.clone(),
                JsonRpcError::invalid_request(),
            ));
        }

        // Initialization gate: only `initialize` is allowed before the
        // handshake completes
        if !self.initialized && req.method != "initialize" {
            if req.id.is_none() {
                return None;
            }
            return Some(JsonRpcResponse::error(
                req.id.clone(),
                JsonRpcError::invalid_request_with("Server not initialized"),
            ));
        }

        let response = self.route(req).await;
        if req.method == "initialize" {
            self.initialized = true;
        }
        response
    }

    /// Map a gated request onto a dispatcher request.
    async fn route(&self, req: &JsonRpcRequest) -> Option<JsonRpcResponse> {
        match req.method.as_str() {
            "initialize" => {
                let result = json!({
                    "protocolVersion": PROTOCOL_VERSION,
                    "capabilities": {
                        "tools": {},
                        "resources": {}
                    },
                    "serverInfo": {
                        "name": env!("CARGO_PKG_NAME"),
                        "version": env!("CARGO_PKG_VERSION")
                    }
                });
                Some(JsonRpcResponse::success(req.id.clone(), result))
            }

            "notifications/initialized" => None,

            "ping" => Some(JsonRpcResponse::success(req.id.clone(), json!({}))),

            "tools/list" => Some(self.dispatch(req, Request::ListTools).await),

            "tools/call" => {
                let params: ToolCallParams = match parse_params(req) {
                    Ok(p) => p,
                    Err(resp) => return Some(resp),
                };
                Some(
                    self.dispatch(
                        req,
                        Request::CallTool {
                            name: params.name,
                            arguments: params.arguments,
                        },
                    )
                    .await,
                )
            }

            "resources/list" => Some(self.dispatch(req, Request::ListResources).await),

            "resources/read" => {
                let params: ReadResourceParams = match parse_params(req) {
                    Ok(p) => p,
                    Err(resp) => return Some(resp),
                };
                Some(
                    self.dispatch(req, Request::ReadResource { uri: params.uri })
                        .await,
                )
            }

            _ => Some(JsonRpcResponse::error(
                req.id.clone(),
                JsonRpcError::method_not_found(&req.method),
            )),
        }
    }

    async fn dispatch(&self, req: &JsonRpcRequest, request: Request) -> JsonRpcResponse {
        match self.dispatcher.handle(request).await {
            Ok(response) => match result_value(response) {
                Ok(value) => {
                    info!(method = %req.method, outcome = "success", "request dispatched");
                    JsonRpcResponse::success(req.id.clone(), value)
                }
                Err(e) => {
                    warn!(method = %req.method, error = %e, "result serialization failed");
                    JsonRpcResponse::error(
                        req.id.clone(),
                        JsonRpcError::internal_error(format!("Result serialization failed: {e}")),
                    )
                }
            },
            Err(err) => {
                info!(method = %req.method, outcome = "failure", error = %err, "request dispatched");
                JsonRpcResponse::error(req.id.clone(), err.into())
            }
        }
    }
}

fn parse_params<T: serde::de::DeserializeOwned>(
    req: &JsonRpcRequest,
) -> Result<T, JsonRpcResponse> {
    let method = &req.method;
    match &req.params {
        Some(v) => serde_json::from_value(v.clone()).map_err(|e| {
            JsonRpcResponse::error(
                req.id.clone(),
                JsonRpcError::invalid_params(format!("Invalid {method} params: {e}")),
            )
        }),
        None => Err(JsonRpcResponse::error(
            req.id.clone(),
            JsonRpcError::invalid_params(format!("Missing params for {method}")),
        )),
    }
}

fn result_value(response: Response) -> Result<serde_json::Value, serde_json::Error> {
    match response {
        Response::Tools(tools) => serde_json::to_value(ListToolsResult { tools }),
        Response::ToolOutput(contents) => serde_json::to_value(ToolResult::from_contents(contents)),
        Response::Resources(resources) => {
            serde_json::to_value(ListResourcesResult { resources })
        }
        Response::ResourceContents(contents) => {
            serde_json::to_value(ReadResourceResult::from_contents(contents))
        }
    }
}

async fn write_response(
    stdout: &mut tokio::io::Stdout,
    resp: &JsonRpcResponse,
) -> Result<(), Box<dyn std::error::Error>> {
    let out = serde_json::to_string(resp)?;
    stdout.write_all(out.as_bytes()).await?;
    stdout.write_all(b"\n").await?;
    stdout.flush().await?;
    Ok(())
}
