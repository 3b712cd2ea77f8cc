//! Novella API Layer
//!
//! Thin wrapper over the platform's HTTP API:
//! - joins request paths onto a configured base URL
//! - attaches the bearer credential at send time, never at configuration
//!   time, so a logout can never race a stale token onto the wire
//! - decodes the `{code, message, data}` response envelope and checks the
//!   application-level code independently of the transport status
//! - funnels every transport-level 401 through one registered hook

mod client;
mod credentials;
mod envelope;
mod error;

pub use client::{ApiClient, DEFAULT_TIMEOUT};
pub use credentials::CredentialStore;
pub use envelope::{Envelope, SUCCESS_CODE};
pub use error::ApiError;

pub type Result<T> = std::result::Result<T, ApiError>;
