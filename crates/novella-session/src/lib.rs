//! Novella Session Management
//!
//! Single authority for authentication state:
//! - owns the current user, the bearer token, and the derived
//!   authenticated/admin flags
//! - persists the token (and only the token) across restarts; the user
//!   record is always re-fetched
//! - publishes the credential to the API layer and clears it on logout
//! - serializes transitions so a logout always beats a slower in-flight
//!   login, register, or profile refresh

mod error;
mod manager;
mod session;
mod transport;
mod user;

pub use error::SessionError;
pub use manager::SessionManager;
pub use session::{RegisterOutcome, Session};
pub use transport::{AuthApi, LoginData, LoginRequest, RegisterData, RegisterRequest};
pub use user::{ProfileUpdate, User};

pub type Result<T> = std::result::Result<T, SessionError>;
