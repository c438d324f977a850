//! REST edge — snapshot fetches and identity operations.
//!
//! DESIGN
//! ======
//! The store and the token service are external collaborators, reached only
//! through the `Backend` trait. Snapshot reads are point-in-time and
//! read-only; identity operations are the login/register/verify/sign
//! quartet. `ApiError` separates transport failure (fetches degrade to the
//! component's prior state) from server rejection (surfaces as an auth
//! failure at the prompt) — callers never see a panic from this module.

use async_trait::async_trait;
use serde_json::Value;

use crate::event::{ChatEntry, Identity};
use crate::state::poll::Poll;

// =============================================================================
// ERRORS
// =============================================================================

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("http request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("{op} rejected: {message}")]
    Rejected { op: &'static str, message: String },
    #[error("missing expected field `{0}`")]
    MissingField(&'static str),
}

impl ApiError {
    /// Whether the server understood and refused the request (bad
    /// credentials, invalid token) as opposed to the transport failing.
    #[must_use]
    pub fn is_rejection(&self) -> bool {
        matches!(self, Self::Rejected { .. })
    }
}

// =============================================================================
// BACKEND TRAIT
// =============================================================================

/// The external session/message/poll store plus the opaque token service.
///
/// All methods are total in the sense of the error design above; no call
/// here is retried or cancelled by the core.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Full message history, oldest first.
    async fn fetch_messages(&self) -> Result<Vec<ChatEntry>, ApiError>;

    /// Full participant roster.
    async fn fetch_roster(&self) -> Result<Vec<Identity>, ApiError>;

    /// Current poll state. `None` is a valid response.
    async fn fetch_poll(&self) -> Result<Option<Poll>, ApiError>;

    async fn login(&self, username: &str, password: &str) -> Result<Identity, ApiError>;

    async fn register(
        &self,
        username: &str,
        password: &str,
        color: &str,
        bg_color: &str,
    ) -> Result<Identity, ApiError>;

    /// Verify a stored token and recover the identity it asserts.
    async fn verify(&self, token: &str) -> Result<Identity, ApiError>;

    /// Have the token service issue a signed token for a verified identity.
    async fn sign(&self, identity: &Identity) -> Result<String, ApiError>;
}

// =============================================================================
// HTTP BACKEND
// =============================================================================

/// `Backend` over plain HTTP endpoints.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    base_url: String,
    http: reqwest::Client,
}

impl HttpBackend {
    #[must_use]
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            http: reqwest::Client::new(),
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn get_json(&self, op: &'static str, path: &str) -> Result<Value, ApiError> {
        let resp = self.http.get(self.endpoint(path)).send().await?;
        check_status(op, resp).await
    }

    async fn post_json(&self, op: &'static str, path: &str, body: &Value) -> Result<Value, ApiError> {
        let resp = self.http.post(self.endpoint(path)).json(body).send().await?;
        check_status(op, resp).await
    }
}

/// Map a non-success status to a rejection carrying the response body.
async fn check_status(op: &'static str, resp: reqwest::Response) -> Result<Value, ApiError> {
    let status = resp.status();
    if !status.is_success() {
        let message = resp.text().await.unwrap_or_default();
        return Err(ApiError::Rejected {
            op,
            message: format!("{status}: {message}"),
        });
    }
    Ok(resp.json::<Value>().await?)
}

#[async_trait]
impl Backend for HttpBackend {
    async fn fetch_messages(&self) -> Result<Vec<ChatEntry>, ApiError> {
        let value = self.get_json("fetch messages", "/messages").await?;
        Ok(serde_json::from_value(value).unwrap_or_default())
    }

    async fn fetch_roster(&self) -> Result<Vec<Identity>, ApiError> {
        let value = self.get_json("fetch roster", "/users").await?;
        Ok(serde_json::from_value(value).unwrap_or_default())
    }

    async fn fetch_poll(&self) -> Result<Option<Poll>, ApiError> {
        let value = self.get_json("fetch poll", "/vote").await?;
        // The store answers with an empty object when no poll is active.
        Ok(serde_json::from_value(value).ok())
    }

    async fn login(&self, username: &str, password: &str) -> Result<Identity, ApiError> {
        let body = serde_json::json!({ "username": username, "password": password });
        let value = self.post_json("login", "/login", &body).await?;
        parse_identity(value)
    }

    async fn register(
        &self,
        username: &str,
        password: &str,
        color: &str,
        bg_color: &str,
    ) -> Result<Identity, ApiError> {
        let body = serde_json::json!({
            "username": username,
            "password": password,
            "color": color,
            "bgColor": bg_color,
        });
        let value = self.post_json("register", "/register", &body).await?;
        parse_identity(value)
    }

    async fn verify(&self, token: &str) -> Result<Identity, ApiError> {
        let body = serde_json::json!({ "token": token });
        let value = self.post_json("verify", "/verify", &body).await?;
        parse_identity(value)
    }

    async fn sign(&self, identity: &Identity) -> Result<String, ApiError> {
        let body = serde_json::to_value(identity).unwrap_or_default();
        let value = self.post_json("sign", "/sign", &body).await?;
        value
            .get("token")
            .and_then(Value::as_str)
            .map(ToOwned::to_owned)
            .ok_or(ApiError::MissingField("token"))
    }
}

fn parse_identity(value: Value) -> Result<Identity, ApiError> {
    serde_json::from_value(value).map_err(|_| ApiError::MissingField("username"))
}

#[cfg(test)]
#[path = "api_test.rs"]
mod tests;
