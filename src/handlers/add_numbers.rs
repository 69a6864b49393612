use serde::Deserialize;
use serde_json::Value;

use crate::registry::{Content, HandlerError, RegistryError, ToolRegistry};
use crate::schema::{FieldType, ToolSchema};

#[derive(Debug, Deserialize)]
struct AddNumbersParams {
    a: f64,
    b: f64,
}

pub fn register(tools: &mut ToolRegistry) -> Result<(), RegistryError> {
    tools.register(
        "add_numbers",
        "Add two numbers together",
        ToolSchema::new()
            .required("a", FieldType::Number, "First number")
            .required("b", FieldType::Number, "Second number"),
        |args| Box::pin(handle(args)),
    )
}

async fn handle(args: Value) -> Result<Vec<Content>, HandlerError> {
    let params: AddNumbersParams = super::decode_args(args)?;
    let sum = params.a + params.b;
    Ok(vec![Content::text(format!(
        "Result: {} + {} = {}",
        params.a, params.b, sum
    ))])
}
