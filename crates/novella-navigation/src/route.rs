//! Route declarations and matching

/// A declared page with its access requirements.
#[derive(Debug, Clone)]
pub struct Route {
    pub path: String,
    pub name: String,
    pub requires_auth: bool,
    pub requires_admin: bool,
}

impl Route {
    pub fn new(path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            requires_auth: false,
            requires_admin: false,
        }
    }

    pub fn authenticated(mut self) -> Self {
        self.requires_auth = true;
        self
    }

    /// Admin pages also require authentication.
    pub fn admin_only(mut self) -> Self {
        self.requires_auth = true;
        self.requires_admin = true;
        self
    }

    /// Segment-wise path match; `:param` segments match any single
    /// non-empty segment.
    pub fn matches(&self, path: &str) -> bool {
        let pattern: Vec<&str> = self.path.split('/').filter(|s| !s.is_empty()).collect();
        let target: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        if pattern.len() != target.len() {
            return false;
        }

        pattern
            .iter()
            .zip(&target)
            .all(|(p, t)| p.starts_with(':') || p == t)
    }
}

#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// The platform's page inventory.
    pub fn defaults() -> Self {
        Self::new()
            .with(Route::new("/", "Home"))
            .with(Route::new("/login", "Login"))
            .with(Route::new("/register", "Register"))
            .with(Route::new("/profile", "Profile").authenticated())
            .with(Route::new("/novel/:id", "NovelDetail"))
            .with(Route::new("/read/:id", "Reader").authenticated())
            .with(Route::new("/upload", "Upload").authenticated())
            .with(Route::new("/category", "Category"))
            .with(Route::new("/ranking", "Ranking"))
            .with(Route::new("/search", "Search"))
            .with(Route::new("/admin/review", "AdminReview").admin_only())
            .with(Route::new("/about", "About"))
    }

    pub fn with(mut self, route: Route) -> Self {
        self.routes.push(route);
        self
    }

    /// Find the first declared route matching the path. Query and
    /// fragment parts are ignored.
    pub fn resolve(&self, path: &str) -> Option<&Route> {
        let path = path.split(['?', '#']).next().unwrap_or(path);
        self.routes.iter().find(|route| route.matches(path))
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_static_match() {
        let route = Route::new("/profile", "Profile");
        assert!(route.matches("/profile"));
        assert!(route.matches("profile"));
        assert!(!route.matches("/profile/settings"));
        assert!(!route.matches("/upload"));
    }

    #[test]
    fn test_param_match() {
        let route = Route::new("/novel/:id", "NovelDetail");
        assert!(route.matches("/novel/42"));
        assert!(route.matches("/novel/abc"));
        assert!(!route.matches("/novel"));
        assert!(!route.matches("/novel/42/chapters"));
    }

    #[test]
    fn test_root_match() {
        let route = Route::new("/", "Home");
        assert!(route.matches("/"));
        assert!(!route.matches("/about"));
    }

    #[test]
    fn test_resolve_ignores_query() {
        let table = RouteTable::defaults();
        let route = table.resolve("/search?q=dragons").unwrap();
        assert_eq!(route.name, "Search");
    }

    #[test]
    fn test_default_table_requirements() {
        let table = RouteTable::defaults();

        let reader = table.resolve("/read/7").unwrap();
        assert!(reader.requires_auth);
        assert!(!reader.requires_admin);

        let review = table.resolve("/admin/review").unwrap();
        assert!(review.requires_auth);
        assert!(review.requires_admin);

        let home = table.resolve("/").unwrap();
        assert!(!home.requires_auth);

        assert!(table.resolve("/nowhere").is_none());
    }
}
