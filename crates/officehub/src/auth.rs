//! Authorization gate for administrative operations.
//!
//! The admin token is resolved once at startup from the identity store and
//! handed to the gate; every privileged route compares the `x-admin-token`
//! header against it by plain string equality.

use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::identity::AuthToken;

/// Header carrying the administrator credential on privileged requests.
pub const ADMIN_TOKEN_HEADER: &str = "x-admin-token";

/// Pull the admin credential off the request headers, if any.
pub fn admin_header(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(ADMIN_TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
}

/// Fixed rejection detail returned on every failed admin check.
pub const ADMIN_TOKEN_INVALID: &str = "invalid administrator token";

#[derive(Debug, Clone)]
pub struct AdminGate {
    token: AuthToken,
}

impl AdminGate {
    pub fn new(token: AuthToken) -> Self {
        Self { token }
    }

    /// Admit the request only when the presented header value equals the
    /// admin token. A missing header never passes.
    pub fn require_admin(&self, presented: Option<&str>) -> Result<(), AdminGateError> {
        match presented {
            Some(value) if value == self.token.as_str() => Ok(()),
            _ => Err(AdminGateError::Forbidden),
        }
    }

    /// Whether a resolved user token is the administrator's own credential.
    pub fn is_admin_token(&self, token: &AuthToken) -> bool {
        token == &self.token
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AdminGateError {
    #[error("invalid administrator token")]
    Forbidden,
}

impl IntoResponse for AdminGateError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "detail": ADMIN_TOKEN_INVALID }));
        (StatusCode::FORBIDDEN, body).into_response()
    }
}
