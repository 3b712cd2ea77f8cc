//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Storage error: {0}")]
    Storage(#[from] novella_storage::StorageError),

    #[error("API error: {0}")]
    Api(#[from] novella_api::ApiError),

    #[error("Session error: {0}")]
    Session(#[from] novella_session::SessionError),

    #[error("Navigation error: {0}")]
    Navigation(#[from] novella_navigation::NavigationError),

    #[error("Configuration error: {0}")]
    Config(String),
}
