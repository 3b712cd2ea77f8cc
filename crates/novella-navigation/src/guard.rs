//! Route guard
//!
//! Pure decision function over a route's declared requirements and the
//! caller's session flags. Holds no state of its own.

use crate::route::Route;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    RedirectToLogin,
    RedirectToHome,
}

/// The authentication check runs before the admin check: an anonymous
/// session on an admin route is sent to login, not home.
pub fn evaluate(route: &Route, authenticated: bool, admin: bool) -> GuardDecision {
    if route.requires_auth && !authenticated {
        return GuardDecision::RedirectToLogin;
    }

    if route.requires_admin && !admin {
        return GuardDecision::RedirectToHome;
    }

    GuardDecision::Allow
}
