//! Printdesk Core Library
//!
//! Domain models, error taxonomy, configuration, and the access policy for
//! the printdesk order-intake service. This crate performs no I/O; the
//! `sqlx` feature only adds row/type derives for the database crate.

pub mod config;
pub mod error;
pub mod models;
pub mod policy;

pub use config::Config;
pub use error::{AppError, ErrorMetadata, LogLevel};
