use std::net::SocketAddr;
use std::sync::Arc;

use chatrelay_core::pipeline::ReplyPipeline;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod error;
mod extract;
mod inference;
mod middleware;
mod routes;
mod state;

#[tokio::main]
async fn main() {
    // Load .env if present (dev only)
    let _ = dotenvy::dotenv();

    // Structured JSON logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "chatrelay_api=debug,chatrelay_core=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().json())
        .init();

    if let Err(err) = run().await {
        tracing::error!("{}", err);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = config::ServerConfig::from_env()?;
    tracing::debug!(?config, "Configuration loaded");

    let backend = inference::HuggingFaceClient::new(&config)?;
    let app_state = state::AppState {
        pipeline: ReplyPipeline::new(Arc::new(backend), config.generation.clone()),
    };

    let cors_layer = middleware::cors::build_cors_layer(&config.cors_origins);
    let app = routes::app(app_state, cors_layer);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("chatrelay API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", err);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
