use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use issue_labeler::config::MapConfig;
use issue_labeler::labeler::{DryRunLabeler, select};
use issue_labeler::processor::EventProcessor;
use issue_labeler::server::{AppState, SharedLabeler, build_router};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Environment variable holding the listen address.
const ADDR_VAR: &str = "ISSUE_LABELER_ADDR";
const DEFAULT_ADDR: &str = "0.0.0.0:3000";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,issue_labeler=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = MapConfig::from_vars(std::env::vars());
    tracing::debug!(keys = config.len(), "Loaded configuration from environment");

    let addr_str = std::env::var(ADDR_VAR).unwrap_or_else(|_| DEFAULT_ADDR.to_string());
    let addr: SocketAddr = addr_str
        .parse()
        .with_context(|| format!("invalid {ADDR_VAR}: {addr_str}"))?;

    let labeler: SharedLabeler = Arc::new(DryRunLabeler);
    let app = build_router(AppState::new(EventProcessor::new(labeler, config, select)));

    tracing::info!("listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    axum::serve(listener, app).await.context("server error")?;
    Ok(())
}
