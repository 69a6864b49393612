use std::sync::OnceLock;
use std::time::Instant;

use chrono::{SecondsFormat, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::registry::{Content, HandlerError, RegistryError, ToolRegistry};
use crate::schema::ToolSchema;

static STARTED_AT: OnceLock<Instant> = OnceLock::new();

#[derive(Debug, Serialize)]
struct SystemInfo {
    platform: &'static str,
    architecture: &'static str,
    server_version: &'static str,
    uptime_seconds: u64,
    generated_at_utc: String,
}

pub fn register(tools: &mut ToolRegistry) -> Result<(), RegistryError> {
    STARTED_AT.get_or_init(Instant::now);
    tools.register(
        "get_system_info",
        "Get basic system information",
        ToolSchema::new(),
        |args| Box::pin(handle(args)),
    )
}

async fn handle(_args: Value) -> Result<Vec<Content>, HandlerError> {
    let info = SystemInfo {
        platform: std::env::consts::OS,
        architecture: std::env::consts::ARCH,
        server_version: env!("CARGO_PKG_VERSION"),
        uptime_seconds: STARTED_AT.get_or_init(Instant::now).elapsed().as_secs(),
        generated_at_utc: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    };

    let json = serde_json::to_string_pretty(&info)
        .map_err(|e| HandlerError::new(format!("system info serialization: {e}")))?;
    Ok(vec![Content::text(format!("System info: {json}"))])
}
