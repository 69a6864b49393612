pub mod request;
pub mod response;

pub use request::{
    InitializeParams, JsonRpcRequest, ReadResourceParams, RpcId, ToolCallParams,
};
pub use response::{
    JsonRpcError, JsonRpcResponse, ListResourcesResult, ListToolsResult, ReadResourceResult,
    ResourceContent, ToolResult, ToolResultContent,
};
