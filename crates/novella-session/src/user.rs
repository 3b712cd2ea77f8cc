//! User data structures

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Account record as returned by the server.
///
/// Only `id` is guaranteed on every payload; the rest default so partial
/// records (e.g. the one in a pending-activation register response) still
/// decode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: u64,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub nickname: String,
    #[serde(default)]
    pub is_active: bool,
    #[serde(default)]
    pub is_admin: bool,
    #[serde(default)]
    pub is_activated: bool,
    #[serde(default)]
    pub last_login_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Fields accepted by the profile update endpoint.
///
/// Structured rather than flat; absent fields are left out of the request
/// body and the server keeps their current values.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nickname: Option<String>,
}

impl ProfileUpdate {
    pub fn nickname(nickname: impl Into<String>) -> Self {
        Self {
            nickname: Some(nickname.into()),
        }
    }
}
