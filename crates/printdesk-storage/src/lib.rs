//! Printdesk Storage Library
//!
//! Gateway to a single S3-compatible object store. The service never
//! proxies file bytes: clients PUT and GET directly against signed URLs
//! issued here, and the only other operation is a metadata existence probe
//! used to reconcile upload state.
//!
//! # Storage key format
//!
//! Keys are derived once at reservation time and never reused:
//!
//! - **Customer uploads**: `uploads/{principal_id}/{millis}-{filename}`
//! - **Processed files**: `processed/{principal_id}/{millis}-{filename}`
//!
//! Filenames are sanitized to `[A-Za-z0-9.-]` before embedding. Key
//! generation is centralized in the `keys` module.

pub mod factory;
pub mod keys;
pub mod s3;
pub mod traits;

pub use factory::create_storage;
pub use keys::derive_key;
pub use s3::S3Storage;
pub use traits::{ObjectStorage, StorageError, StorageResult};
