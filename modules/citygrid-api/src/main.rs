use std::sync::Arc;

use anyhow::Result;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use citygrid_api::{build_router, AppState};
use citygrid_common::Config;
use citygrid_graph::{seed, GraphSnapshot};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("citygrid=info".parse()?))
        .init();

    let config = Config::from_env()?;
    config.log_summary();

    let snapshot = GraphSnapshot::new(seed::load(config.graph_seed_path.as_deref())?);
    for issue in snapshot.validate() {
        warn!(%issue, "Graph snapshot issue");
    }

    let state = Arc::new(AppState::new(snapshot));
    let app = build_router(state, &config.cors_allowed_origins);

    let addr = format!("{}:{}", config.web_host, config.web_port);
    info!("City grid simulation API starting on {addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
