//! Built-in sample resources.
//!
//! Both materialize at read time so their timestamps reflect the moment of
//! the read, not registration time.

use chrono::{SecondsFormat, Utc};
use serde_json::json;

use crate::registry::{Content, HandlerError, RegistryError, ResourceRegistry};

pub const EXAMPLE_TEXT_URI: &str = "file://example.txt";
pub const EXAMPLE_JSON_URI: &str = "file://example.json";

pub fn register(resources: &mut ResourceRegistry) -> Result<(), RegistryError> {
    resources.register(
        EXAMPLE_TEXT_URI,
        "Example Text File",
        "A sample text file resource",
        "text/plain",
        || Box::pin(read_example_text()),
    )?;
    resources.register(
        EXAMPLE_JSON_URI,
        "Example JSON File",
        "A sample JSON file resource",
        "application/json",
        || Box::pin(read_example_json()),
    )
}

async fn read_example_text() -> Result<Vec<Content>, HandlerError> {
    let generated_at = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
    Ok(vec![Content::text(format!(
        "This is an example text file.\n\
         It contains some sample content for demonstration purposes.\n\
         Generated at: {generated_at}"
    ))])
}

async fn read_example_json() -> Result<Vec<Content>, HandlerError> {
    let payload = json!({
        "name": "Example JSON",
        "version": "1.0.0",
        "features": ["tool_calling", "resource_reading", "basic_operations"],
        "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    });

    let text = serde_json::to_string_pretty(&payload)
        .map_err(|e| HandlerError::new(format!("example.json serialization: {e}")))?;
    Ok(vec![Content::text(text)])
}
