//! Smushit Gateway
//!
//! HTTP service that downloads a batch of remote files, zips them and hands
//! back a time-limited download link to the archive stored in S3.

mod config;
mod dto;
mod handlers;
mod routes;

use anyhow::Result;
use smushit_archive::ZipArchiver;
use smushit_domain::{BatchCoordinator, BundleService, Publisher};
use smushit_fetch::HttpFetcher;
use smushit_s3::infrastructure::{build_client, S3ObjectStore};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::{GatewayConfig, LogFormat};

/// The bundle pipeline wired to its production adapters
pub type GatewayService = BundleService<HttpFetcher, ZipArchiver, S3ObjectStore>;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub bundle_service: Arc<GatewayService>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();

    let config = GatewayConfig::from_env()?;
    init_tracing(config.log_format);

    info!("Starting Smushit gateway");

    let s3_client = build_client(&config.s3).await;
    info!(bucket = %config.s3.bucket, "Initializing S3 object store");
    let store = S3ObjectStore::new(s3_client, config.s3.bucket.clone());

    let fetcher = HttpFetcher::new(config.fetcher.clone())?;

    let service = BundleService::new(
        BatchCoordinator::new(fetcher, config.coordinator.clone()),
        ZipArchiver::default(),
        Publisher::new(store, config.publisher.clone()),
        config.bundle.clone(),
    );

    let state = AppState {
        bundle_service: Arc::new(service),
    };

    let app = routes::create_router(state);

    let addr = config.bind_address();
    info!(addr = %addr, "Starting HTTP server");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// `RUST_LOG` drives the filter (default `info`)
fn init_tracing(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter);

    match format {
        LogFormat::Json => subscriber.json().init(),
        LogFormat::Plain => subscriber.init(),
    }
}
