//! Storage abstraction trait
//!
//! This module defines the ObjectStorage trait the upload session and
//! download link services depend on.

use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Failed to sign URL: {0}")]
    SignFailed(String),

    #[error("Storage backend error: {0}")]
    BackendError(String),

    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Object-storage gateway
///
/// One implementation is constructed at startup and injected behind
/// `Arc<dyn ObjectStorage>`; nothing else holds store configuration.
/// The store itself enforces signature validity and expiry; the gateway
/// keeps no local state.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Produce a signed URL authorizing a single HTTP PUT to `key`,
    /// valid for `expires_in`.
    async fn issue_upload_url(&self, key: &str, expires_in: Duration) -> StorageResult<String>;

    /// Produce a signed URL authorizing HTTP GET of `key`, valid for
    /// `expires_in`.
    async fn issue_download_url(&self, key: &str, expires_in: Duration) -> StorageResult<String>;

    /// Metadata-only existence check. Returns `Ok(false)` when the object
    /// is absent; any other failure (network, auth misconfiguration)
    /// propagates as an error, distinct from "absent".
    async fn exists(&self, key: &str) -> StorageResult<bool>;
}
