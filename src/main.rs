//! Weather Agent Server
//!
//! A REST server exposing a weather chat agent and a weather activity-planning
//! workflow, plus a framework API to inspect and run registered agents and
//! workflows.

use std::net::SocketAddr;
use std::sync::Arc;

use tracing::info;
use weather_agent_server::config::Config;
use weather_agent_server::server;
use weather_agent_server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    // Load configuration
    let config = Config::from_env();
    info!("Configuration loaded: {:?}", config);

    if config.llm.api_key.is_none() {
        tracing::warn!("GEMINI_API_KEY is not set; agent requests will fail");
    }

    // Bind to address from config
    let addr: SocketAddr = config
        .server_addr()
        .parse()
        .map_err(|e| anyhow::anyhow!("Invalid server address: {}", e))?;

    let state = Arc::new(AppState::from_config(config)?);

    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    server::serve(addr, state).await
}
