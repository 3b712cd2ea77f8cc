//! Response envelope
//!
//! The server wraps every response body as `{code, message, data}`. The
//! embedded code signals success or failure independently of the HTTP
//! status, so both get checked.

use serde::Deserialize;

use crate::error::ApiError;

/// Application-level success code
pub const SUCCESS_CODE: u16 = 200;

#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct Envelope<T> {
    pub code: u16,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn is_success(&self) -> bool {
        self.code == SUCCESS_CODE
    }

    /// Unwrap the payload, classifying non-success codes.
    ///
    /// Codes 401 and 403 are credential/session rejections; everything
    /// else non-success is a validation failure carried back to the
    /// caller verbatim.
    pub fn into_data(self) -> Result<T, ApiError> {
        if self.is_success() {
            return self
                .data
                .ok_or_else(|| ApiError::Decode("success envelope without data".to_string()));
        }

        let message = self
            .message
            .unwrap_or_else(|| "request failed".to_string());

        match self.code {
            401 | 403 => Err(ApiError::Auth(message)),
            code => Err(ApiError::Validation { code, message }),
        }
    }
}
