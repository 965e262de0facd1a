//! Printdesk database layer
//!
//! sqlx/Postgres repositories for orders and order files. All upload-state
//! mutations are single-row writes; the order-file repository is the only
//! writer of `status` and `storage_url`.

pub mod db;

pub use db::order_files::OrderFileRepository;
pub use db::orders::OrderRepository;
