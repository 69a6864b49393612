use mcp_sample_server::config::ServerConfig;
use mcp_sample_server::dispatch::Dispatcher;
use mcp_sample_server::handlers;
use mcp_sample_server::logging;
use mcp_sample_server::server::McpServer;
use tracing::error;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    logging::init_logging();

    let config = match ServerConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!("configuration error: {e}");
            std::process::exit(1);
        }
    };

    let (tools, resources) = match handlers::build_registries(&config) {
        Ok(registries) => registries,
        Err(e) => {
            error!("registry error: {e}");
            std::process::exit(1);
        }
    };

    let mut server = McpServer::new(Dispatcher::new(tools, resources));
    if let Err(e) = server.run().await {
        error!("fatal transport error: {e}");
        std::process::exit(1);
    }
}
