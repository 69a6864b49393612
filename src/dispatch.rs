use serde_json::{Map, Value};
use tracing::debug;

use crate::registry::{
    Content, HandlerError, ResourceInfo, ResourceRegistry, ToolInfo, ToolRegistry,
};
use crate::schema::FieldErrors;

/// A parsed request, one variant per supported operation. Unknown operations
/// are unrepresentable here; the transport maps unrecognized method names to
/// a protocol error before this type is ever constructed.
#[derive(Debug, Clone, PartialEq)]
pub enum Request {
    ListTools,
    CallTool {
        name: String,
        arguments: Option<Map<String, Value>>,
    },
    ListResources,
    ReadResource {
        uri: String,
    },
}

/// Normalized success payload for each request kind.
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    Tools(Vec<ToolInfo>),
    ToolOutput(Vec<Content>),
    Resources(Vec<ResourceInfo>),
    ResourceContents(Vec<Content>),
}

/// The protocol-visible failure taxonomy. Nothing else crosses the dispatch
/// boundary; validator-library errors are mapped to `InvalidArguments` and
/// handler failures pass through unchanged as `Handler`.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error("unknown tool: {0}")]
    UnknownTool(String),
    #[error("unknown resource: {0}")]
    UnknownResource(String),
    #[error("invalid arguments: {0}")]
    InvalidArguments(FieldErrors),
    #[error(transparent)]
    Handler(#[from] HandlerError),
}

/// Routes requests to registry lookup, argument validation, and handler
/// invocation. Holds no per-request state; every call is independent.
pub struct Dispatcher {
    tools: ToolRegistry,
    resources: ResourceRegistry,
}

impl Dispatcher {
    pub fn new(tools: ToolRegistry, resources: ResourceRegistry) -> Self {
        Self { tools, resources }
    }

    pub async fn handle(&self, request: Request) -> Result<Response, DispatchError> {
        match request {
            Request::ListTools => Ok(Response::Tools(self.tools.list())),
            Request::CallTool { name, arguments } => self.call_tool(&name, arguments).await,
            Request::ListResources => Ok(Response::Resources(self.resources.list())),
            Request::ReadResource { uri } => self.read_resource(&uri).await,
        }
    }

    async fn call_tool(
        &self,
        name: &str,
        arguments: Option<Map<String, Value>>,
    ) -> Result<Response, DispatchError> {
        let tool = self
            .tools
            .resolve(name)
            .ok_or_else(|| DispatchError::UnknownTool(name.to_string()))?;

        // An absent argument object still validates against the schema (as
        // the empty object), so zero-field schemas reject stray fields
        // uniformly in strict mode.
        let args = Value::Object(arguments.unwrap_or_default());
        tool.schema
            .validate(&args)
            .map_err(DispatchError::InvalidArguments)?;

        debug!(tool = name, "invoking tool handler");
        let contents = (tool.handler)(args).await?;
        Ok(Response::ToolOutput(contents))
    }

    async fn read_resource(&self, uri: &str) -> Result<Response, DispatchError> {
        let resource = self
            .resources
            .resolve(uri)
            .ok_or_else(|| DispatchError::UnknownResource(uri.to_string()))?;

        debug!(uri, "materializing resource");
        let mut contents = (resource.materializer)().await?;
        for content in &mut contents {
            if content.uri.is_none() {
                content.uri = Some(resource.info.uri.clone());
            }
            if content.mime_type.is_none() {
                content.mime_type = Some(resource.info.mime_type.clone());
            }
        }
        Ok(Response::ResourceContents(contents))
    }
}
