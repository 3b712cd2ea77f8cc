//! Novella Storage Layer
//!
//! SQLite-backed persistence for client-side state that must survive
//! restarts. The reading views treat this as a plain string key-value
//! store; the session layer keeps exactly one entry here (the bearer
//! token).

mod database;
mod error;
mod migrations;

pub use database::Database;
pub use error::StorageError;

pub type Result<T> = std::result::Result<T, StorageError>;
