//! Shared bearer credential cell
//!
//! One writer (the session manager), read by the API client on every
//! send. Cleared on logout so an in-flight request built after the clear
//! cannot pick up the stale token.

use parking_lot::RwLock;
use std::sync::Arc;

#[derive(Default)]
pub struct CredentialStore {
    token: Arc<RwLock<Option<String>>>,
}

impl CredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&self, token: String) {
        *self.token.write() = Some(token);
    }

    pub fn clear(&self) {
        *self.token.write() = None;
    }

    pub fn token(&self) -> Option<String> {
        self.token.read().clone()
    }

    pub fn is_present(&self) -> bool {
        self.token.read().is_some()
    }
}

impl Clone for CredentialStore {
    fn clone(&self) -> Self {
        Self {
            token: Arc::clone(&self.token),
        }
    }
}
