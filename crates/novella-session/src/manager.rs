//! Session manager
//!
//! Sole mutator of session state, the shared credential cell, and the
//! persisted token. Every mutating operation runs as a tagged transition:
//! the network result is applied only if no newer transition (most
//! importantly a logout) has taken over in the meantime.

use parking_lot::RwLock;
use std::sync::Arc;
use uuid::Uuid;

use novella_api::CredentialStore;
use novella_storage::Database;

use crate::error::SessionError;
use crate::session::{RegisterOutcome, Session};
use crate::transport::{AuthApi, LoginRequest, RegisterData, RegisterRequest};
use crate::user::{ProfileUpdate, User};
use crate::Result;

/// Storage key for the persisted bearer token
const TOKEN_KEY: &str = "token";

struct SessionState {
    session: Session,
    /// Transition whose eventual result is still allowed to apply
    active_transition: Option<Uuid>,
}

pub struct SessionManager {
    state: Arc<RwLock<SessionState>>,
    api: Arc<dyn AuthApi>,
    credentials: CredentialStore,
    db: Database,
}

impl SessionManager {
    pub fn new(api: Arc<dyn AuthApi>, credentials: CredentialStore, db: Database) -> Self {
        Self {
            state: Arc::new(RwLock::new(SessionState {
                session: Session::default(),
                active_transition: None,
            })),
            api,
            credentials,
            db,
        }
    }

    /// Current session snapshot
    pub fn session(&self) -> Session {
        self.state.read().session.clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.read().session.is_authenticated()
    }

    pub fn is_admin(&self) -> bool {
        self.state.read().session.is_admin()
    }

    pub fn current_user(&self) -> Option<User> {
        self.state.read().session.user.clone()
    }

    /// Load the persisted token, if any, into memory and the credential
    /// cell. The session stays anonymous until `fetch_profile` confirms
    /// the token; returns whether a token was found so the caller knows
    /// to follow up.
    pub fn hydrate(&self) -> Result<bool> {
        let Some(token) = self.db.get_setting(TOKEN_KEY)? else {
            return Ok(false);
        };

        let mut state = self.state.write();
        state.session.token = Some(token.clone());
        self.credentials.set(token);

        tracing::info!("Restored persisted session token");
        Ok(true)
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<Session> {
        let transition = self.begin_transition();

        let data = match self.api.login(LoginRequest { email, password }).await {
            Ok(data) => data,
            Err(e) => {
                // State is left untouched; the caller decides presentation
                self.release_transition(transition);
                return Err(e.into());
            }
        };

        let user_id = data.user.id;
        self.apply_if_current(transition, |session| {
            session.token = Some(data.token.clone());
            session.user = Some(data.user);
            self.credentials.set(data.token.clone());
            self.db.set_setting(TOKEN_KEY, &data.token)?;
            Ok(())
        })?;

        tracing::info!(user_id, "Logged in");
        Ok(self.session())
    }

    pub async fn register(
        &self,
        email: &str,
        password: &str,
        nickname: &str,
    ) -> Result<RegisterOutcome> {
        let transition = self.begin_transition();

        let request = RegisterRequest {
            email,
            password,
            nickname,
        };
        let data = match self.api.register(request).await {
            Ok(data) => data,
            Err(e) => {
                self.release_transition(transition);
                return Err(e.into());
            }
        };

        let RegisterData {
            token,
            user,
            message,
        } = data;
        let user_id = user.id;

        match token {
            Some(token) => {
                // Server activated the account immediately; same effect
                // as a successful login
                self.apply_if_current(transition, |session| {
                    session.token = Some(token.clone());
                    session.user = Some(user.clone());
                    self.credentials.set(token.clone());
                    self.db.set_setting(TOKEN_KEY, &token)?;
                    Ok(())
                })?;

                tracing::info!(user_id, "Registered with immediate activation");
                Ok(RegisterOutcome::Activated { token, user })
            }
            None => {
                // Account pending activation: keep the user record but
                // stay anonymous
                self.apply_if_current(transition, |session| {
                    session.user = Some(user.clone());
                    Ok(())
                })?;

                tracing::info!(user_id, "Registered, activation pending");
                Ok(RegisterOutcome::PendingActivation { user, message })
            }
        }
    }

    /// Refresh the user record for the held token.
    ///
    /// No-op when no token is held. Any failure means the credential is
    /// no longer good: the whole session is cleared, including the
    /// persisted token, before the error is surfaced.
    pub async fn fetch_profile(&self) -> Result<Option<User>> {
        if self.state.read().session.token.is_none() {
            return Ok(None);
        }

        let transition = self.begin_transition();

        match self.api.fetch_profile().await {
            Ok(user) => {
                self.apply_if_current(transition, |session| {
                    session.user = Some(user.clone());
                    Ok(())
                })?;

                tracing::info!(user_id = user.id, "Profile confirmed");
                Ok(Some(user))
            }
            Err(e) => {
                if let Err(storage_err) = self.logout() {
                    tracing::error!(
                        "Failed to clear session after profile failure: {storage_err}"
                    );
                }
                Err(e.into())
            }
        }
    }

    /// Update profile fields; the returned record replaces the stored
    /// user, the token is untouched. An anonymous call is not rejected
    /// locally — the server answers 401 and the central handling applies.
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<User> {
        let transition = self.begin_transition();

        match self.api.update_profile(update).await {
            Ok(user) => {
                self.apply_if_current(transition, |session| {
                    session.user = Some(user.clone());
                    Ok(())
                })?;

                tracing::info!(user_id = user.id, "Profile updated");
                Ok(user)
            }
            Err(e) => {
                self.release_transition(transition);
                Err(e.into())
            }
        }
    }

    /// Clear the session, the credential cell, and the persisted token.
    /// Idempotent; also invalidates any in-flight transition.
    pub fn logout(&self) -> Result<()> {
        let mut state = self.state.write();
        state.active_transition = None;
        state.session.clear();
        self.credentials.clear();
        self.db.remove_setting(TOKEN_KEY)?;

        tracing::info!("Logged out");
        Ok(())
    }

    /// Transport-level 401 effect: same clearing as `logout`, applied
    /// unconditionally. Wired as the API client's unauthorized hook.
    pub fn handle_unauthorized(&self) {
        let mut state = self.state.write();
        state.active_transition = None;
        state.session.clear();
        self.credentials.clear();
        if let Err(e) = self.db.remove_setting(TOKEN_KEY) {
            tracing::error!("Failed to drop persisted token: {e}");
        }

        tracing::warn!("Session invalidated by server");
    }

    fn begin_transition(&self) -> Uuid {
        let transition = Uuid::new_v4();
        self.state.write().active_transition = Some(transition);
        transition
    }

    fn release_transition(&self, transition: Uuid) {
        let mut state = self.state.write();
        if state.active_transition == Some(transition) {
            state.active_transition = None;
        }
    }

    /// Apply a completed transition's effects, unless something newer
    /// (another operation or a logout) took over while the network call
    /// was in flight.
    fn apply_if_current<F>(&self, transition: Uuid, apply: F) -> Result<()>
    where
        F: FnOnce(&mut Session) -> Result<()>,
    {
        let mut state = self.state.write();
        if state.active_transition != Some(transition) {
            tracing::debug!(%transition, "Dropping superseded transition result");
            return Err(SessionError::Superseded);
        }

        state.active_transition = None;
        apply(&mut state.session)
    }
}

impl Clone for SessionManager {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            api: Arc::clone(&self.api),
            credentials: self.credentials.clone(),
            db: self.db.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::LoginData;
    use async_trait::async_trait;
    use novella_api::ApiError;
    use parking_lot::Mutex;
    use tokio::sync::oneshot;

    /// Scripted collaborator: each slot holds at most one response and
    /// panics if an unexpected endpoint is hit.
    #[derive(Default)]
    struct StubApi {
        login_response: Mutex<Option<novella_api::Result<LoginData>>>,
        register_response: Mutex<Option<novella_api::Result<RegisterData>>>,
        profile_response: Mutex<Option<novella_api::Result<User>>>,
        update_response: Mutex<Option<novella_api::Result<User>>>,
        login_entered: Mutex<Option<oneshot::Sender<()>>>,
        login_release: Mutex<Option<oneshot::Receiver<()>>>,
    }

    #[async_trait]
    impl AuthApi for StubApi {
        async fn login(&self, _request: LoginRequest<'_>) -> novella_api::Result<LoginData> {
            if let Some(entered) = self.login_entered.lock().take() {
                let _ = entered.send(());
            }
            let release = self.login_release.lock().take();
            if let Some(release) = release {
                let _ = release.await;
            }
            self.login_response
                .lock()
                .take()
                .expect("unexpected login call")
        }

        async fn register(
            &self,
            _request: RegisterRequest<'_>,
        ) -> novella_api::Result<RegisterData> {
            self.register_response
                .lock()
                .take()
                .expect("unexpected register call")
        }

        async fn fetch_profile(&self) -> novella_api::Result<User> {
            self.profile_response
                .lock()
                .take()
                .expect("unexpected profile call")
        }

        async fn update_profile(&self, _update: &ProfileUpdate) -> novella_api::Result<User> {
            self.update_response
                .lock()
                .take()
                .expect("unexpected update call")
        }
    }

    fn user(id: u64, is_admin: bool) -> User {
        serde_json::from_str(&format!(r#"{{"id":{id},"is_admin":{is_admin}}}"#)).unwrap()
    }

    fn manager_with(api: StubApi) -> (SessionManager, CredentialStore, Database) {
        let credentials = CredentialStore::new();
        let db = Database::open_in_memory().unwrap();
        let manager = SessionManager::new(Arc::new(api), credentials.clone(), db.clone());
        (manager, credentials, db)
    }

    #[tokio::test]
    async fn test_login_success() {
        let api = StubApi::default();
        *api.login_response.lock() = Some(Ok(LoginData {
            token: "T1".to_string(),
            user: user(1, false),
        }));
        let (manager, credentials, db) = manager_with(api);

        let session = manager.login("a@x.com", "pw").await.unwrap();

        assert!(session.is_authenticated());
        assert!(!session.is_admin());
        assert_eq!(session.token.as_deref(), Some("T1"));

        // Credential published and token persisted
        assert_eq!(credentials.token().as_deref(), Some("T1"));
        assert_eq!(db.get_setting("token").unwrap().as_deref(), Some("T1"));

        // Persisted token round-trips to the in-memory one
        assert_eq!(db.get_setting("token").unwrap(), session.token);
    }

    #[tokio::test]
    async fn test_login_failure_leaves_state_unchanged() {
        let api = StubApi::default();
        *api.login_response.lock() =
            Some(Err(ApiError::Auth("wrong email or password".to_string())));
        let (manager, credentials, db) = manager_with(api);

        let err = manager.login("a@x.com", "bad").await.unwrap_err();
        assert!(matches!(err, SessionError::Api(ApiError::Auth(_))));

        assert!(!manager.is_authenticated());
        assert!(credentials.token().is_none());
        assert_eq!(db.get_setting("token").unwrap(), None);
    }

    #[tokio::test]
    async fn test_register_pending_activation() {
        let api = StubApi::default();
        *api.register_response.lock() = Some(Ok(RegisterData {
            token: None,
            user: user(2, false),
            message: Some("verify email".to_string()),
        }));
        let (manager, credentials, db) = manager_with(api);

        let outcome = manager.register("b@x.com", "pw", "reader").await.unwrap();

        match outcome {
            RegisterOutcome::PendingActivation { user, message } => {
                assert_eq!(user.id, 2);
                assert_eq!(message.as_deref(), Some("verify email"));
            }
            other => panic!("Expected PendingActivation, got {other:?}"),
        }

        // User stored, session still anonymous, nothing persisted
        let session = manager.session();
        assert_eq!(session.user.as_ref().map(|u| u.id), Some(2));
        assert!(session.token.is_none());
        assert!(!session.is_authenticated());
        assert!(credentials.token().is_none());
        assert_eq!(db.get_setting("token").unwrap(), None);
    }

    #[tokio::test]
    async fn test_register_with_immediate_activation() {
        let api = StubApi::default();
        *api.register_response.lock() = Some(Ok(RegisterData {
            token: Some("T2".to_string()),
            user: user(3, false),
            message: None,
        }));
        let (manager, _credentials, db) = manager_with(api);

        let outcome = manager.register("c@x.com", "pw", "writer").await.unwrap();

        assert!(matches!(outcome, RegisterOutcome::Activated { .. }));
        assert!(manager.is_authenticated());
        assert_eq!(db.get_setting("token").unwrap().as_deref(), Some("T2"));
    }

    #[tokio::test]
    async fn test_fetch_profile_without_token_is_noop() {
        // Stub has no scripted response; a network call would panic
        let (manager, _credentials, _db) = manager_with(StubApi::default());

        let result = manager.fetch_profile().await.unwrap();
        assert!(result.is_none());
        assert!(!manager.is_authenticated());
    }

    #[tokio::test]
    async fn test_fetch_profile_confirms_restored_token() {
        let api = StubApi::default();
        *api.profile_response.lock() = Some(Ok(user(1, true)));
        let (manager, _credentials, db) = manager_with(api);

        // Simulate a prior run that persisted a token
        db.set_setting("token", "T1").unwrap();
        assert!(manager.hydrate().unwrap());

        // Token alone does not authenticate
        assert!(!manager.is_authenticated());

        let fetched = manager.fetch_profile().await.unwrap().unwrap();
        assert_eq!(fetched.id, 1);
        assert!(manager.is_authenticated());
        assert!(manager.is_admin());
    }

    #[tokio::test]
    async fn test_fetch_profile_rejection_clears_everything() {
        let api = StubApi::default();
        *api.profile_response.lock() = Some(Err(ApiError::Unauthorized));
        let (manager, credentials, db) = manager_with(api);

        db.set_setting("token", "stale").unwrap();
        manager.hydrate().unwrap();

        let err = manager.fetch_profile().await.unwrap_err();
        assert!(matches!(err, SessionError::Api(ApiError::Unauthorized)));

        // Token and user both gone, including from storage
        let session = manager.session();
        assert!(session.token.is_none());
        assert!(session.user.is_none());
        assert!(credentials.token().is_none());
        assert_eq!(db.get_setting("token").unwrap(), None);
    }

    #[tokio::test]
    async fn test_update_profile_replaces_user_keeps_token() {
        let api = StubApi::default();
        *api.login_response.lock() = Some(Ok(LoginData {
            token: "T1".to_string(),
            user: user(1, false),
        }));
        let mut updated = user(1, false);
        updated.nickname = "bookworm".to_string();
        *api.update_response.lock() = Some(Ok(updated));
        let (manager, _credentials, _db) = manager_with(api);

        manager.login("a@x.com", "pw").await.unwrap();

        let returned = manager
            .update_profile(&ProfileUpdate::nickname("bookworm"))
            .await
            .unwrap();
        assert_eq!(returned.nickname, "bookworm");

        let session = manager.session();
        assert_eq!(session.user.map(|u| u.nickname), Some("bookworm".to_string()));
        assert_eq!(session.token.as_deref(), Some("T1"));
    }

    #[tokio::test]
    async fn test_logout_is_idempotent() {
        let api = StubApi::default();
        *api.login_response.lock() = Some(Ok(LoginData {
            token: "T1".to_string(),
            user: user(1, false),
        }));
        let (manager, credentials, db) = manager_with(api);

        manager.login("a@x.com", "pw").await.unwrap();

        manager.logout().unwrap();
        manager.logout().unwrap();

        let session = manager.session();
        assert!(session.token.is_none());
        assert!(session.user.is_none());
        assert!(credentials.token().is_none());
        assert_eq!(db.get_setting("token").unwrap(), None);
    }

    #[tokio::test]
    async fn test_handle_unauthorized_clears_session() {
        let api = StubApi::default();
        *api.login_response.lock() = Some(Ok(LoginData {
            token: "T1".to_string(),
            user: user(1, false),
        }));
        let (manager, credentials, db) = manager_with(api);

        manager.login("a@x.com", "pw").await.unwrap();
        manager.handle_unauthorized();

        assert!(!manager.is_authenticated());
        assert!(credentials.token().is_none());
        assert_eq!(db.get_setting("token").unwrap(), None);
    }

    #[tokio::test]
    async fn test_logout_supersedes_in_flight_login() {
        let api = StubApi::default();
        *api.login_response.lock() = Some(Ok(LoginData {
            token: "T1".to_string(),
            user: user(1, false),
        }));
        let (entered_tx, entered_rx) = oneshot::channel();
        let (release_tx, release_rx) = oneshot::channel();
        *api.login_entered.lock() = Some(entered_tx);
        *api.login_release.lock() = Some(release_rx);

        let (manager, credentials, db) = manager_with(api);

        let in_flight = manager.clone();
        let task = tokio::spawn(async move { in_flight.login("a@x.com", "pw").await });

        // Wait until the login has reached the collaborator, then log out
        entered_rx.await.unwrap();
        manager.logout().unwrap();
        release_tx.send(()).unwrap();

        // The delayed success must not resurrect the session
        let result = task.await.unwrap();
        assert!(matches!(result, Err(SessionError::Superseded)));

        assert!(!manager.is_authenticated());
        assert!(credentials.token().is_none());
        assert_eq!(db.get_setting("token").unwrap(), None);
    }
}
