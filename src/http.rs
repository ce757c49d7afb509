//! Thin reqwest wrapper shared by every remote service.
//!
//! Responsibilities end at transport concerns: base-URL joining, bearer
//! injection, and mapping response statuses onto [`ApiError`]. A 401
//! clears the session store before the error reaches the caller, which
//! is the client-side equivalent of a forced logout.

use reqwest::{RequestBuilder, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::errors::{ApiError, ValidationPayload};
use crate::session::SessionStore;

const USER_AGENT: &str = concat!("svt-inventory-client/", env!("CARGO_PKG_VERSION"));

#[derive(Clone)]
pub struct HttpClient {
    client: reqwest::Client,
    base_url: String,
    session: Arc<SessionStore>,
}

impl HttpClient {
    pub fn new(config: &ClientConfig, session: Arc<SessionStore>) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.execute(self.client.get(self.endpoint(path))).await
    }

    pub async fn get_query<Q: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        query: &Q,
    ) -> Result<T, ApiError> {
        self.execute(self.client.get(self.endpoint(path)).query(query))
            .await
    }

    pub async fn post<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.execute(self.client.post(self.endpoint(path)).json(body))
            .await
    }

    /// Form-urlencoded POST, used by the OAuth2 password login flow.
    pub async fn post_form<F: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        form: &F,
    ) -> Result<T, ApiError> {
        self.execute(self.client.post(self.endpoint(path)).form(form))
            .await
    }

    pub async fn put<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        self.execute(self.client.put(self.endpoint(path)).json(body))
            .await
    }

    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let request = self.client.delete(self.endpoint(path));
        let response = self.send(request).await?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(self.map_failure(status, body))
    }

    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let response = self.send(request).await?;
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        if status.is_success() {
            return serde_json::from_str(&body).map_err(ApiError::from);
        }
        Err(self.map_failure(status, body))
    }

    async fn send(&self, request: RequestBuilder) -> Result<reqwest::Response, ApiError> {
        let request = match self.session.bearer() {
            Some(bearer) => request.header(reqwest::header::AUTHORIZATION, bearer),
            None => request,
        };
        Ok(request.send().await?)
    }

    fn map_failure(&self, status: StatusCode, body: String) -> ApiError {
        match status {
            StatusCode::UNAUTHORIZED => {
                warn!("received 401, clearing session");
                self.session.clear();
                ApiError::Unauthorized
            }
            StatusCode::UNPROCESSABLE_ENTITY => {
                let payload = serde_json::from_str::<ValidationPayload>(&body).unwrap_or_default();
                debug!(detail_count = payload.detail.len(), "validation failure");
                ApiError::Validation(payload)
            }
            StatusCode::NOT_FOUND => ApiError::NotFound(detail_message(&body)),
            StatusCode::BAD_REQUEST | StatusCode::CONFLICT => {
                ApiError::BusinessRule(detail_message(&body))
            }
            _ => ApiError::Server { status, body },
        }
    }
}

/// Backend business errors arrive as `{"detail": "..."}`. Fall back to
/// the raw body when the shape differs.
fn detail_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("detail").and_then(|d| d.as_str()).map(String::from))
        .unwrap_or_else(|| body.to_string())
}
