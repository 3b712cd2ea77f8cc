//! API error taxonomy
//!
//! Closed set: transport failures, the transport-level 401 (handled
//! centrally), application-level credential rejection, and every other
//! non-success envelope code.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid request URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Malformed response: {0}")]
    Decode(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Authentication rejected: {0}")]
    Auth(String),

    #[error("Request rejected (code {code}): {message}")]
    Validation { code: u16, message: String },
}
