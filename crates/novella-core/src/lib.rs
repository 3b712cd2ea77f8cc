//! Novella Core
//!
//! Central coordination layer for the Novella reading client. Owns the
//! wiring between storage, the API client, the session manager, and the
//! router; the rendering layer consumes this crate and holds no state of
//! its own.

mod app;
mod config;
mod error;

pub use app::App;
pub use config::Config;
pub use error::CoreError;

// Re-export core components
pub use novella_api::{ApiClient, ApiError, CredentialStore, Envelope};
pub use novella_navigation::{
    GuardDecision, Navigation, NavigationError, Route, RouteTable, Router,
};
pub use novella_session::{
    ProfileUpdate, RegisterOutcome, Session, SessionError, SessionManager, User,
};
pub use novella_storage::{Database, StorageError};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).with_target(true).init();
}
