use crate::{ObjectStorage, S3Storage, StorageResult};
use printdesk_core::Config;
use std::sync::Arc;

/// Create the process-wide object-storage gateway from configuration.
///
/// This is the single composition point for store credentials; everything
/// downstream receives the narrow `ObjectStorage` interface and never
/// touches endpoint or credential state again.
pub fn create_storage(config: &Config) -> StorageResult<Arc<dyn ObjectStorage>> {
    let storage = S3Storage::new(
        config.bucket.clone(),
        config.region.clone(),
        config.endpoint.clone(),
        config.access_key_id.clone(),
        config.secret_access_key.clone(),
    )?;
    Ok(Arc::new(storage))
}
