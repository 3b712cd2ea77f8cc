//! HTTP collaborator seam
//!
//! The session manager talks to the server through this trait so tests
//! can substitute a scripted collaborator. The real implementation rides
//! on `novella_api::ApiClient`, which handles credential attachment and
//! the centralized 401 hook.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use novella_api::ApiClient;

use crate::user::{ProfileUpdate, User};

const LOGIN_PATH: &str = "/api/v1/users/login";
const REGISTER_PATH: &str = "/api/v1/users/register";
const PROFILE_PATH: &str = "/api/v1/users/profile";

#[derive(Debug, Serialize)]
pub struct LoginRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

#[derive(Debug, Serialize)]
pub struct RegisterRequest<'a> {
    pub email: &'a str,
    pub password: &'a str,
    pub nickname: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct LoginData {
    pub token: String,
    pub user: User,
}

/// Register success payload; the token is absent for accounts that still
/// need a separate activation step.
#[derive(Debug, Deserialize)]
pub struct RegisterData {
    #[serde(default)]
    pub token: Option<String>,
    pub user: User,
    #[serde(default)]
    pub message: Option<String>,
}

#[async_trait]
pub trait AuthApi: Send + Sync {
    async fn login(&self, request: LoginRequest<'_>) -> novella_api::Result<LoginData>;

    async fn register(&self, request: RegisterRequest<'_>) -> novella_api::Result<RegisterData>;

    /// Profile GET; the server returns the user record directly as the
    /// envelope data.
    async fn fetch_profile(&self) -> novella_api::Result<User>;

    async fn update_profile(&self, update: &ProfileUpdate) -> novella_api::Result<User>;
}

#[async_trait]
impl AuthApi for ApiClient {
    async fn login(&self, request: LoginRequest<'_>) -> novella_api::Result<LoginData> {
        self.post(LOGIN_PATH, &request).await
    }

    async fn register(&self, request: RegisterRequest<'_>) -> novella_api::Result<RegisterData> {
        self.post(REGISTER_PATH, &request).await
    }

    async fn fetch_profile(&self) -> novella_api::Result<User> {
        self.get(PROFILE_PATH).await
    }

    async fn update_profile(&self, update: &ProfileUpdate) -> novella_api::Result<User> {
        self.put(PROFILE_PATH, update).await
    }
}
