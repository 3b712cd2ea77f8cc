//! API client
//!
//! All platform traffic goes through here. The 401 hook fires for any
//! request that comes back unauthorized, before the error reaches the
//! caller, so session invalidation cannot be forgotten at a call site.

use parking_lot::RwLock;
use reqwest::Method;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

use crate::credentials::CredentialStore;
use crate::envelope::Envelope;
use crate::error::ApiError;
use crate::Result;

/// Bounded request timeout applied to every call
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

type UnauthorizedHook = Arc<dyn Fn() + Send + Sync>;

pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    credentials: CredentialStore,
    on_unauthorized: Arc<RwLock<Option<UnauthorizedHook>>>,
}

impl ApiClient {
    pub fn new(base_url: Url, credentials: CredentialStore) -> Result<Self> {
        Self::with_timeout(base_url, credentials, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(
        base_url: Url,
        credentials: CredentialStore,
        timeout: Duration,
    ) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self {
            http,
            base_url,
            credentials,
            on_unauthorized: Arc::new(RwLock::new(None)),
        })
    }

    /// Register the hook fired on any transport-level 401.
    ///
    /// Replaces a previously registered hook; all clones of this client
    /// share the registration.
    pub fn set_unauthorized_hook<F>(&self, hook: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        *self.on_unauthorized.write() = Some(Arc::new(hook));
    }

    pub fn credentials(&self) -> &CredentialStore {
        &self.credentials
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        self.request::<T, ()>(Method::GET, path, None).await
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::POST, path, Some(body)).await
    }

    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(Method::PUT, path, Some(body)).await
    }

    async fn request<T, B>(&self, method: Method, path: &str, body: Option<&B>) -> Result<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self.base_url.join(path)?;

        let mut builder = self.http.request(method.clone(), url);

        // Credential is read at send time, not at client construction
        if let Some(token) = self.credentials.token() {
            builder = builder.bearer_auth(token);
        }

        if let Some(body) = body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;

        if response.status() == reqwest::StatusCode::UNAUTHORIZED {
            return Err(self.unauthorized(&method, path));
        }

        let envelope: Envelope<T> = response.json().await?;
        envelope.into_data()
    }

    /// Fire the registered hook and produce the unauthorized error.
    fn unauthorized(&self, method: &Method, path: &str) -> ApiError {
        tracing::warn!(%method, path, "Request rejected as unauthorized");

        let hook = self.on_unauthorized.read().clone();
        if let Some(hook) = hook {
            hook();
        }

        ApiError::Unauthorized
    }
}

impl Clone for ApiClient {
    fn clone(&self) -> Self {
        Self {
            http: self.http.clone(),
            base_url: self.base_url.clone(),
            credentials: self.credentials.clone(),
            on_unauthorized: Arc::clone(&self.on_unauthorized),
        }
    }
}
