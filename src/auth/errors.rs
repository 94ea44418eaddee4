//! Failure taxonomy of the user service and the uniform result envelope.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Serialize, Serializer};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum UserError {
    #[error("User email was not informed.")]
    MissingEmail,
    #[error("Email and password must be informed.")]
    MissingCredentials,
    // Reported as 400 rather than 404; clients depend on it.
    #[error("User was not found.")]
    NotFound,
    #[error("You cannot see this user data.")]
    Forbidden,
    #[error("Password doesn't match.")]
    CredentialMismatch,
    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl UserError {
    pub fn status(&self) -> StatusCode {
        match self {
            UserError::MissingEmail | UserError::NotFound => StatusCode::BAD_REQUEST,
            UserError::MissingCredentials | UserError::CredentialMismatch => {
                StatusCode::UNAUTHORIZED
            }
            UserError::Forbidden => StatusCode::FORBIDDEN,
            UserError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

fn serialize_status<S: Serializer>(status: &StatusCode, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u16(status.as_u16())
}

/// Outcome of a service operation: `{status, ...payload}` or `{status, message}`.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ServiceResult<T> {
    Success {
        #[serde(serialize_with = "serialize_status")]
        status: StatusCode,
        #[serde(flatten)]
        payload: T,
    },
    Failure {
        #[serde(serialize_with = "serialize_status")]
        status: StatusCode,
        message: String,
    },
}

impl<T> ServiceResult<T> {
    pub fn status(&self) -> StatusCode {
        match self {
            ServiceResult::Success { status, .. } | ServiceResult::Failure { status, .. } => *status,
        }
    }
}

impl<T> From<Result<T, UserError>> for ServiceResult<T> {
    fn from(result: Result<T, UserError>) -> Self {
        match result {
            Ok(payload) => ServiceResult::Success {
                status: StatusCode::OK,
                payload,
            },
            Err(error) => ServiceResult::Failure {
                status: error.status(),
                message: error.to_string(),
            },
        }
    }
}

impl<T: Serialize> IntoResponse for ServiceResult<T> {
    fn into_response(self) -> Response {
        (self.status(), Json(self)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::models::TokenResponse;
    use serde_json::json;

    #[test]
    fn test_status_mapping() {
        assert_eq!(UserError::MissingEmail.status(), StatusCode::BAD_REQUEST);
        assert_eq!(UserError::NotFound.status(), StatusCode::BAD_REQUEST);
        assert_eq!(UserError::MissingCredentials.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(UserError::CredentialMismatch.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(UserError::Forbidden.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            UserError::from(anyhow::anyhow!("boom")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_unexpected_message_passes_through() {
        let result: ServiceResult<()> = Err(UserError::from(anyhow::anyhow!("pool timed out"))).into();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json, json!({ "status": 500, "message": "pool timed out" }));
    }

    #[test]
    fn test_success_flattens_payload() {
        let result: ServiceResult<TokenResponse> = Ok(TokenResponse {
            access_token: "t".to_string(),
        })
        .into();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json, json!({ "status": 200, "accessToken": "t" }));
    }
}
