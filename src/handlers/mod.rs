pub mod add_numbers;
pub mod echo;
pub mod resources;
pub mod system_info;
pub mod validate_email;

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::ServerConfig;
use crate::registry::{HandlerError, RegistryError, ResourceRegistry, ToolRegistry};

/// Build the tool and resource registries with every built-in handler.
///
/// Called once at startup; a failure here (duplicate name, malformed
/// schema) is a startup fault and terminates the process.
pub fn build_registries(
    config: &ServerConfig,
) -> Result<(ToolRegistry, ResourceRegistry), RegistryError> {
    let mut tools = ToolRegistry::new(config.strict_arguments);
    echo::register(&mut tools)?;
    add_numbers::register(&mut tools)?;
    system_info::register(&mut tools)?;
    validate_email::register(&mut tools)?;

    let mut resources = ResourceRegistry::new();
    resources::register(&mut resources)?;

    Ok((tools, resources))
}

/// Decode the already schema-validated argument object into a typed params
/// struct. A failure here means the schema and the params struct disagree,
/// which is a handler bug, not a caller error.
pub(crate) fn decode_args<T: DeserializeOwned>(args: Value) -> Result<T, HandlerError> {
    serde_json::from_value(args)
        .map_err(|e| HandlerError::new(format!("argument decode failed after validation: {e}")))
}
