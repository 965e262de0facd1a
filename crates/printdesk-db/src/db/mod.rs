//! Database repositories for data access layer
//!
//! Each repository owns one domain entity and provides its queries; dynamic
//! `sqlx::query` binds are used throughout to avoid requiring DATABASE_URL
//! at build time.

pub mod order_files;
pub mod orders;
