/// Server configuration loaded from environment variables.
#[derive(Debug, Clone, Default)]
pub struct ServerConfig {
    /// Reject unknown argument fields instead of tolerating them.
    pub strict_arguments: bool,
}

impl ServerConfig {
    /// Load configuration from environment.
    ///
    /// - `MCP_SAMPLE_STRICT_ARGS` (optional, default false) — strict
    ///   rejection of argument fields not declared in a tool's schema
    pub fn from_env() -> Result<Self, String> {
        let strict_arguments = match std::env::var("MCP_SAMPLE_STRICT_ARGS") {
            Ok(val) => match val.trim().to_ascii_lowercase().as_str() {
                "1" | "true" => true,
                "0" | "false" | "" => false,
                _ => {
                    return Err(
                        "MCP_SAMPLE_STRICT_ARGS must be one of: true, false, 1, 0".to_string()
                    )
                }
            },
            Err(_) => false,
        };

        Ok(Self { strict_arguments })
    }
}
