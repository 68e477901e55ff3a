use anyhow::{Context, Result};
use duet_server::{AppState, ServerConfig, router};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Initializing Duet room relay...");

    let config = ServerConfig::from_env()?;
    info!(
        "Rooms admit {} members, durable backlog {}",
        config.room.max_members,
        if config.room.durable_backlog { "enabled" } else { "disabled" }
    );

    let app = router(AppState::new(config.room.clone()));

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    info!("Signaling relay listening on http://{}", config.bind_addr);

    axum::serve(listener, app).await.context("Relay server stopped")?;
    Ok(())
}
