use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{routing::get, Router};
use clap::Parser;
use immobilien_service::ImmobilienServiceModule;
use sea_orm::{ConnectOptions, Database};
use tokio::net::TcpListener;
use tower_http::{
    cors::CorsLayer,
    limit::RequestBodyLimitLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};
use tracing::info;

mod config;
mod logging;

use crate::config::AppConfig;

/// Immobilien server
#[derive(Debug, Parser)]
#[command(version, about)]
struct Cli {
    /// Path to a YAML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log filter, overrides RUST_LOG and the configured level
    #[arg(long)]
    log_level: Option<String>,

    /// Apply migrations and exit
    #[arg(long)]
    migrate_only: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AppConfig::load(cli.config.as_deref())?;
    logging::init(&config.logging, cli.log_level.as_deref())?;

    info!("Starting immobilien server v{}", env!("CARGO_PKG_VERSION"));

    let mut options = ConnectOptions::new(config.database.url.clone());
    options
        .max_connections(config.database.max_connections)
        .connect_timeout(config.database.connect_timeout)
        .acquire_timeout(config.database.acquire_timeout)
        .sqlx_logging(false);
    let db = Arc::new(
        Database::connect(options)
            .await
            .context("failed to connect to database")?,
    );

    if cli.migrate_only {
        ImmobilienServiceModule::migrate(&db).await?;
        info!("Migrations applied, exiting");
        return Ok(());
    }

    let module = ImmobilienServiceModule::init(config.immobilien_service.clone(), db).await?;

    let api = module.register_rest(Router::new());
    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        .nest("/api", api)
        .layer(TimeoutLayer::new(config.server.request_timeout))
        .layer(RequestBodyLimitLayer::new(config.server.body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(CorsLayer::permissive());

    let listener = TcpListener::bind(config.server.bind_addr).await?;
    info!("Server listening on {}", config.server.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
