//! Authentication Models
//!
//! Data structures for authentication requests, responses, and user information.

use axum::http::HeaderMap;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Authenticated user information, embedded in tokens and returned by lookups
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

/// Login request payload. Missing fields are rejected by the service, not by
/// deserialization.
#[derive(Default, Deserialize)]
pub struct LoginRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

/// Payload of a successful login
#[derive(Debug, Clone, Serialize)]
pub struct TokenResponse {
    #[serde(rename = "accessToken")]
    pub access_token: String,
}

/// Payload of a successful lookup
#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub user: AuthUser,
}

/// Correlation identifiers forwarded by upstream services
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Correlation {
    pub transaction_id: Option<String>,
    pub service_id: Option<String>,
}

impl Correlation {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let get = |name: &str| {
            headers
                .get(name)
                .and_then(|value| value.to_str().ok())
                .map(str::to_string)
        };
        Self {
            transaction_id: get("transactionid"),
            service_id: get("serviceid"),
        }
    }
}
