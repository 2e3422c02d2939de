use clap::Parser;
use std::sync::Arc;
use tracing::info;

use maestro_dashboard::config::{CliArgs, DashboardConfig};
use maestro_dashboard::server;
use maestro_dashboard::state::DashboardState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "maestro_dashboard=info,tower_http=info".into()),
        )
        .init();

    let args = CliArgs::parse();
    info!("Starting maestro-dashboard v{}", env!("CARGO_PKG_VERSION"));
    if let Some(path) = &args.settings {
        info!("Settings file: {:?}", path);
    }

    let config = DashboardConfig::from_args(args)?;
    let port = config.port;
    info!("Reporting API: {}", config.api_base);
    info!("Grid page length: {}", config.page_length);

    let state = Arc::new(DashboardState::new(config)?);

    // Build and start HTTP server
    let router = server::build_router(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;
    info!("Dashboard listening on http://0.0.0.0:{}", port);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Dashboard shutting down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install Ctrl+C handler: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Received shutdown signal");
}
