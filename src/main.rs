//! ws-test-endpoint server entry point.
//!
//! Binds the mock WebSocket endpoint and serves until a client asks it to
//! stop through `/control` or `/terminateserver`.

use tracing_subscriber::EnvFilter;

use ws_test_endpoint::config::ServerConfig;
use ws_test_endpoint::server::Server;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = ServerConfig::from_env()?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if config.log_json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    tracing::info!(
        addr = %config.listen_addr,
        ping_interval = ?config.ping_interval,
        "starting ws-test-endpoint"
    );

    // Start server
    let server = Server::bind(config).await?;
    server.run().await?;

    Ok(())
}
