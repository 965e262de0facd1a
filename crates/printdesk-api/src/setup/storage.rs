//! Storage setup and initialization

use anyhow::{Context, Result};
use printdesk_core::Config;
use printdesk_storage::{create_storage, ObjectStorage};
use std::sync::Arc;

/// Build the object-storage gateway. Misconfiguration fails here, at
/// startup, not at the first signed-URL request.
pub fn setup_storage(config: &Config) -> Result<Arc<dyn ObjectStorage>> {
    tracing::info!(bucket = %config.bucket, region = %config.region, "Initializing object storage...");
    let storage = create_storage(config).context("Failed to initialize object storage")?;
    tracing::info!("Object storage initialized successfully");
    Ok(storage)
}
