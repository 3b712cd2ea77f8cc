//! Main application state container
//!
//! All client state flows through here; the rendering layer is purely a
//! view over it.

use std::sync::Arc;
use url::Url;

use novella_api::{ApiClient, CredentialStore};
use novella_navigation::{Navigation, Router};
use novella_session::{ProfileUpdate, RegisterOutcome, Session, SessionManager, User};
use novella_storage::Database;

use crate::config::Config;
use crate::error::CoreError;
use crate::Result;

pub struct App {
    /// Configuration
    config: Config,
    /// Local database
    db: Database,
    /// API client
    api: ApiClient,
    /// Session manager
    session_manager: SessionManager,
    /// Router
    router: Router,
}

impl App {
    /// Build and wire the application state.
    pub fn new(config: Config) -> Result<Self> {
        // Ensure data directory exists
        if let Some(parent) = config.database_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let db = Database::open(&config.database_path)?;

        let base_url = Url::parse(&config.api_base_url)
            .map_err(|e| CoreError::Config(format!("Invalid API base URL: {e}")))?;

        let credentials = CredentialStore::new();
        let api = ApiClient::with_timeout(base_url, credentials.clone(), config.request_timeout)?;

        let session_manager = SessionManager::new(Arc::new(api.clone()), credentials, db.clone());
        let router = Router::with_default_routes();

        // Any transport-level 401, from any request, lands here
        api.set_unauthorized_hook(unauthorized_hook(session_manager.clone(), router.clone()));

        Ok(Self {
            config,
            db,
            api,
            session_manager,
            router,
        })
    }

    /// Restore persisted state: load the stored token and confirm it
    /// against the server. A rejected token clears itself; the app then
    /// simply starts anonymous.
    pub async fn initialize(&self) -> Result<()> {
        if self.session_manager.hydrate()? {
            if let Err(e) = self.session_manager.fetch_profile().await {
                tracing::warn!("Persisted token rejected: {e}");
            }
        }

        tracing::info!(
            authenticated = self.session_manager.is_authenticated(),
            "App initialized"
        );

        Ok(())
    }

    // === Session operations ===

    pub fn session_manager(&self) -> &SessionManager {
        &self.session_manager
    }

    pub fn session(&self) -> Session {
        self.session_manager.session()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session_manager.is_authenticated()
    }

    pub fn is_admin(&self) -> bool {
        self.session_manager.is_admin()
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<Session> {
        Ok(self.session_manager.login(email, password).await?)
    }

    pub async fn register(
        &self,
        email: &str,
        password: &str,
        nickname: &str,
    ) -> Result<RegisterOutcome> {
        Ok(self
            .session_manager
            .register(email, password, nickname)
            .await?)
    }

    pub async fn fetch_profile(&self) -> Result<Option<User>> {
        Ok(self.session_manager.fetch_profile().await?)
    }

    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<User> {
        Ok(self.session_manager.update_profile(update).await?)
    }

    pub fn logout(&self) -> Result<()> {
        Ok(self.session_manager.logout()?)
    }

    // === Navigation operations ===

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn current_path(&self) -> String {
        self.router.current_path()
    }

    /// Navigate with the current session's flags.
    pub fn navigate(&self, path: &str) -> Result<Navigation> {
        let session = self.session_manager.session();
        Ok(self
            .router
            .navigate(path, session.is_authenticated(), session.is_admin())?)
    }

    // === Accessors ===

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn database(&self) -> &Database {
        &self.db
    }
}

impl Clone for App {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            db: self.db.clone(),
            api: self.api.clone(),
            session_manager: self.session_manager.clone(),
            router: self.router.clone(),
        }
    }
}

/// The centralized 401 effect: clear the session (memory, credential
/// cell, persisted token) and land on the login page.
fn unauthorized_hook(
    session_manager: SessionManager,
    router: Router,
) -> impl Fn() + Send + Sync + 'static {
    move || {
        session_manager.handle_unauthorized();
        router.redirect_to_login();
    }
}

// Implement std::io::Error conversion for fs operations
impl From<std::io::Error> for CoreError {
    fn from(e: std::io::Error) -> Self {
        CoreError::Config(e.to_string())
    }
}
