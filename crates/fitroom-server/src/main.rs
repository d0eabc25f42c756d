//! fitroom: budget-gated virtual try-on gateway.

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::EnvFilter;

mod routes;
mod state;

use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = fitroom_core::FitroomConfig::from_env()?;
    let port = config.port;

    info!(
        user_limit = %config.user_limit,
        production = config.production,
        "starting fitroom"
    );

    let state = Arc::new(AppState::new(config));
    let app = routes::build_router(state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("fitroom listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
