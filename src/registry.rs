use std::collections::BTreeMap;
use std::fmt;
use std::future::Future;
use std::pin::Pin;

use serde::Serialize;
use serde_json::Value;

use crate::schema::{CompiledSchema, SchemaError, ToolSchema};

/// Opaque, handler-specific failure. Dispatch passes it through unchanged.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct HandlerError {
    message: String,
}

impl HandlerError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Normalized payload unit returned to the caller: text, optionally tagged
/// with the originating resource URI and MIME type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Content {
    pub text: String,
    pub uri: Option<String>,
    pub mime_type: Option<String>,
}

impl Content {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            uri: None,
            mime_type: None,
        }
    }
}

pub type HandlerFuture = Pin<Box<dyn Future<Output = Result<Vec<Content>, HandlerError>> + Send>>;

/// Tool handler: takes the already validated argument object.
pub type ToolHandler = Box<dyn Fn(Value) -> HandlerFuture + Send + Sync>;

/// Resource materializer: runs at read time, never at registration time, so
/// time-varying content reflects the moment of the read.
pub type Materializer = Box<dyn Fn() -> HandlerFuture + Send + Sync>;

/// Discovery metadata for one tool, as listed to clients.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolInfo {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

/// Discovery metadata for one resource, as listed to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResourceInfo {
    pub uri: String,
    pub name: String,
    pub description: String,
    #[serde(rename = "mimeType")]
    pub mime_type: String,
}

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("duplicate tool name: {0}")]
    DuplicateTool(String),
    #[error("duplicate resource uri: {0}")]
    DuplicateResource(String),
    #[error(transparent)]
    Schema(#[from] SchemaError),
}

pub struct RegisteredTool {
    pub info: ToolInfo,
    pub schema: CompiledSchema,
    pub handler: ToolHandler,
}

/// Name-keyed tool registry. Populated once at startup, read-only after.
pub struct ToolRegistry {
    strict_arguments: bool,
    tools: BTreeMap<String, RegisteredTool>,
}

impl ToolRegistry {
    pub fn new(strict_arguments: bool) -> Self {
        Self {
            strict_arguments,
            tools: BTreeMap::new(),
        }
    }

    /// Register a tool under a unique name. The schema is compiled here so a
    /// malformed declaration fails at startup, not per request.
    pub fn register(
        &mut self,
        name: &str,
        description: &str,
        schema: ToolSchema,
        handler: impl Fn(Value) -> HandlerFuture + Send + Sync + 'static,
    ) -> Result<(), RegistryError> {
        if self.tools.contains_key(name) {
            return Err(RegistryError::DuplicateTool(name.to_string()));
        }

        let compiled = schema.compile(self.strict_arguments)?;
        let info = ToolInfo {
            name: name.to_string(),
            description: description.to_string(),
            input_schema: compiled.declaration().clone(),
        };
        self.tools.insert(
            name.to_string(),
            RegisteredTool {
                info,
                schema: compiled,
                handler: Box::new(handler),
            },
        );
        Ok(())
    }

    /// Metadata listing in stable name order.
    pub fn list(&self) -> Vec<ToolInfo> {
        self.tools.values().map(|tool| tool.info.clone()).collect()
    }

    pub fn resolve(&self, name: &str) -> Option<&RegisteredTool> {
        self.tools.get(name)
    }
}

impl fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("strict_arguments", &self.strict_arguments)
            .field("tools", &self.tools.keys().collect::<Vec<_>>())
            .finish()
    }
}

pub struct RegisteredResource {
    pub info: ResourceInfo,
    pub materializer: Materializer,
}

/// URI-keyed resource registry. Populated once at startup, read-only after.
#[derive(Default)]
pub struct ResourceRegistry {
    resources: BTreeMap<String, RegisteredResource>,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        uri: &str,
        name: &str,
        description: &str,
        mime_type: &str,
        materializer: impl Fn() -> HandlerFuture + Send + Sync + 'static,
    ) -> Result<(), RegistryError> {
        if self.resources.contains_key(uri) {
            return Err(RegistryError::DuplicateResource(uri.to_string()));
        }

        let info = ResourceInfo {
            uri: uri.to_string(),
            name: name.to_string(),
            description: description.to_string(),
            mime_type: mime_type.to_string(),
        };
        self.resources.insert(
            uri.to_string(),
            RegisteredResource {
                info,
                materializer: Box::new(materializer),
            },
        );
        Ok(())
    }

    /// Metadata listing in stable uri order.
    pub fn list(&self) -> Vec<ResourceInfo> {
        self.resources
            .values()
            .map(|resource| resource.info.clone())
            .collect()
    }

    pub fn resolve(&self, uri: &str) -> Option<&RegisteredResource> {
        self.resources.get(uri)
    }
}

impl fmt::Debug for ResourceRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResourceRegistry")
            .field("resources", &self.resources.keys().collect::<Vec<_>>())
            .finish()
    }
}
