use anyhow::Context;
use dotenvy::dotenv;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod app;
mod common;
mod config;
mod docs;
mod infrastructure;
mod modules;
mod routes;
mod state;
mod workers;

#[cfg(test)]
mod test_support;

use config::settings::AppConfig;
use infrastructure::media::ffmpeg::{FfmpegFetcher, FfmpegTranscoder};
use infrastructure::storage::local::MediaStorage;
use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting transcode server...");

    let config = AppConfig::new();

    let storage = MediaStorage::new(&config.upload_dir, &config.temp_dir, &config.output_dir)
        .await
        .context("failed to prepare media directories")?;

    let transcoder = Arc::new(FfmpegTranscoder::new(&config.ffmpeg_path));
    let fetcher = Arc::new(FfmpegFetcher::new(&config.ffmpeg_path));

    let addr = config.bind_address();
    let state = AppState::new(config, storage, transcoder, fetcher);

    tokio::spawn(workers::sweeper::start_job_sweeper(state.clone()));

    let app = app::create_app(state);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!("Server running on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
