//! Application setup and initialization
//!
//! All initialization logic extracted from main.rs for better organization.

pub mod database;
pub mod routes;
pub mod server;
pub mod storage;

use crate::services::downloads::DownloadLinkService;
use crate::services::upload::UploadSessionService;
use crate::state::AppState;
use anyhow::Result;
use printdesk_core::Config;
use printdesk_db::{OrderFileRepository, OrderRepository};
use std::sync::Arc;
use std::time::Duration;

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    crate::telemetry::init_telemetry();

    tracing::info!("Configuration loaded and validated successfully");

    // Setup database
    let pool = database::setup_database(&config).await?;

    // Setup storage (the one composition point for store configuration)
    let storage = storage::setup_storage(&config)?;

    // Repositories and services
    let orders = OrderRepository::new(pool.clone());
    let order_files = OrderFileRepository::new(pool.clone());
    let uploads = UploadSessionService::new(
        orders.clone(),
        order_files.clone(),
        storage.clone(),
        Duration::from_secs(config.upload_url_ttl_secs),
    );
    let downloads = DownloadLinkService::new(
        order_files.clone(),
        storage.clone(),
        Duration::from_secs(config.download_url_ttl_secs),
    );

    let state = Arc::new(AppState {
        orders,
        order_files,
        storage,
        uploads,
        downloads,
    });

    // Setup routes
    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
