use serde::Deserialize;
use serde_json::Value;

use crate::registry::{Content, HandlerError, RegistryError, ToolRegistry};
use crate::schema::{FieldType, ToolSchema};

#[derive(Debug, Deserialize)]
struct EchoParams {
    text: String,
}

pub fn register(tools: &mut ToolRegistry) -> Result<(), RegistryError> {
    tools.register(
        "echo",
        "Echo back the input text",
        ToolSchema::new().required("text", FieldType::String, "Text to echo back"),
        |args| Box::pin(handle(args)),
    )
}

async fn handle(args: Value) -> Result<Vec<Content>, HandlerError> {
    let params: EchoParams = super::decode_args(args)?;
    Ok(vec![Content::text(format!("Echo: {}", params.text))])
}
