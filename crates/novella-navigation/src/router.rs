//! Router
//!
//! Tracks the current location and applies guard decisions as concrete
//! moves. The 401 handling in the core calls `redirect_to_login`
//! directly, bypassing the guard (the login page is always reachable).

use parking_lot::RwLock;
use std::sync::Arc;

use crate::error::NavigationError;
use crate::guard::{evaluate, GuardDecision};
use crate::route::RouteTable;
use crate::Result;

pub const HOME_PATH: &str = "/";
pub const LOGIN_PATH: &str = "/login";

/// Outcome of a navigation attempt: the guard's decision and the path
/// actually landed on.
#[derive(Debug, Clone)]
pub struct Navigation {
    pub decision: GuardDecision,
    pub path: String,
}

pub struct Router {
    table: RouteTable,
    current: Arc<RwLock<String>>,
}

impl Router {
    pub fn new(table: RouteTable) -> Self {
        Self {
            table,
            current: Arc::new(RwLock::new(HOME_PATH.to_string())),
        }
    }

    pub fn with_default_routes() -> Self {
        Self::new(RouteTable::defaults())
    }

    pub fn current_path(&self) -> String {
        self.current.read().clone()
    }

    pub fn table(&self) -> &RouteTable {
        &self.table
    }

    /// Attempt to move to `path` with the caller's session flags.
    /// Guarded-away targets land on the redirect destination instead.
    pub fn navigate(&self, path: &str, authenticated: bool, admin: bool) -> Result<Navigation> {
        let route = self
            .table
            .resolve(path)
            .ok_or_else(|| NavigationError::UnknownRoute(path.to_string()))?;

        let decision = evaluate(route, authenticated, admin);
        let destination = match decision {
            GuardDecision::Allow => path.to_string(),
            GuardDecision::RedirectToLogin => LOGIN_PATH.to_string(),
            GuardDecision::RedirectToHome => HOME_PATH.to_string(),
        };

        *self.current.write() = destination.clone();

        tracing::debug!(
            target_route = %route.name,
            destination = %destination,
            ?decision,
            "Navigated"
        );

        Ok(Navigation {
            decision,
            path: destination,
        })
    }

    /// Unconditional redirect used by the unauthorized handling.
    pub fn redirect_to_login(&self) {
        *self.current.write() = LOGIN_PATH.to_string();
        tracing::info!("Redirected to login");
    }
}

impl Clone for Router {
    fn clone(&self) -> Self {
        Self {
            table: self.table.clone(),
            current: Arc::clone(&self.current),
        }
    }
}
