use serde::Deserialize;
use serde_json::Value;

use crate::registry::{Content, HandlerError, RegistryError, ToolRegistry};
use crate::schema::{FieldFormat, FieldType, ToolSchema};

#[derive(Debug, Deserialize)]
struct ValidateEmailParams {
    email: String,
}

pub fn register(tools: &mut ToolRegistry) -> Result<(), RegistryError> {
    tools.register(
        "validate_email",
        "Validate an email address format",
        ToolSchema::new()
            .required("email", FieldType::String, "Email address to validate")
            .format("email", FieldFormat::Email),
        |args| Box::pin(handle(args)),
    )
}

// The schema's format constraint has already rejected malformed addresses
// by the time this runs.
async fn handle(args: Value) -> Result<Vec<Content>, HandlerError> {
    let params: ValidateEmailParams = super::decode_args(args)?;
    Ok(vec![Content::text(format!(
        "Email \"{}\" is valid",
        params.email
    ))])
}
