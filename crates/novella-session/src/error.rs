//! Session error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("API error: {0}")]
    Api(#[from] novella_api::ApiError),

    #[error("Storage error: {0}")]
    Storage(#[from] novella_storage::StorageError),

    #[error("Superseded by a newer session transition")]
    Superseded,
}
