//! Session data structure

use crate::user::User;

/// In-memory authentication state.
///
/// Authenticated means both token and user are present; a register that
/// comes back without a token leaves the user stored but the session
/// anonymous until activation completes.
#[derive(Debug, Clone, Default)]
pub struct Session {
    pub user: Option<User>,
    pub token: Option<String>,
}

impl Session {
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some() && self.user.is_some()
    }

    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(|u| u.is_admin)
    }

    pub(crate) fn clear(&mut self) {
        self.user = None;
        self.token = None;
    }
}

/// Result of a registration attempt.
///
/// The server either activates the account immediately (token included,
/// same effect as a login) or holds it pending a separate activation
/// step, in which case only the user record and an optional
/// human-readable message come back.
#[derive(Debug, Clone)]
pub enum RegisterOutcome {
    Activated { token: String, user: User },
    PendingActivation { user: User, message: Option<String> },
}
