//! Novella Navigation
//!
//! Static route table for the reading platform, a pure guard decision
//! over the caller's session flags, and a router that tracks the current
//! location and applies redirects. Guard ordering is fixed:
//! authentication is evaluated before admin rank, so an anonymous visit
//! to an admin page redirects to login rather than home.

mod error;
mod guard;
mod route;
mod router;

pub use error::NavigationError;
pub use guard::{evaluate, GuardDecision};
pub use route::{Route, RouteTable};
pub use router::{Navigation, Router, HOME_PATH, LOGIN_PATH};

pub type Result<T> = std::result::Result<T, NavigationError>;
