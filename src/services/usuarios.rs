//! Authentication and user administration.

use serde::Serialize;
use std::sync::Arc;
use tracing::{info, instrument};

use crate::errors::ApiError;
use crate::http::HttpClient;
use crate::models::{AuthResponse, RegisterData, User};
use crate::session::{Session, SessionStore};

/// OAuth2 password-flow login. On success the bearer session is stored
/// (and persisted, when configured) so subsequent requests carry it.
#[derive(Clone)]
pub struct AuthService {
    http: HttpClient,
    session: Arc<SessionStore>,
}

#[derive(Serialize)]
struct LoginForm<'a> {
    username: &'a str,
    password: &'a str,
    grant_type: &'static str,
}

impl AuthService {
    pub fn new(http: HttpClient, session: Arc<SessionStore>) -> Self {
        Self { http, session }
    }

    /// The backend speaks the OAuth2 token endpoint dialect: credentials
    /// go form-urlencoded, with the email in the `username` field.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<AuthResponse, ApiError> {
        let form = LoginForm {
            username: email,
            password,
            grant_type: "password",
        };
        let auth: AuthResponse = self.http.post_form("/auth/login", &form).await?;

        self.session.set(Session {
            access_token: auth.access_token.clone(),
            token_type: auth.token_type.clone(),
            user: auth.user.clone(),
        });
        info!("session established");
        Ok(auth)
    }

    #[instrument(skip(self, data), fields(email = %data.email))]
    pub async fn register(&self, data: &RegisterData) -> Result<User, ApiError> {
        self.http.post("/auth/register", data).await
    }

    pub fn logout(&self) {
        self.session.clear();
        info!("session cleared");
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    #[instrument(skip(self))]
    pub async fn me(&self) -> Result<User, ApiError> {
        self.http.get("/users/me").await
    }
}

#[derive(Serialize)]
struct RoleChange<'a> {
    new_role: &'a str,
}

/// Admin-only user management.
#[derive(Clone)]
pub struct UserService {
    http: HttpClient,
}

impl UserService {
    pub fn new(http: HttpClient) -> Self {
        Self { http }
    }

    #[instrument(skip(self))]
    pub async fn get_users(&self) -> Result<Vec<User>, ApiError> {
        self.http.get("/users/").await
    }

    #[instrument(skip(self))]
    pub async fn update_role(&self, user_id: i64, new_role: &str) -> Result<User, ApiError> {
        self.http
            .put(&format!("/users/{}/role", user_id), &RoleChange { new_role })
            .await
    }

    #[instrument(skip(self))]
    pub async fn delete_user(&self, user_id: i64) -> Result<(), ApiError> {
        self.http.delete(&format!("/users/{}", user_id)).await
    }
}
