//! Authentication Middleware
//!
//! Axum middleware for JWT token validation and user authentication.

use axum::{
    Json,
    extract::{Request, State},
    http::{StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use serde_json::json;
use std::sync::Arc;

use crate::auth::{jwt::JwtService, models::AuthUser};

const ACCESS_TOKEN_COOKIE: &str = "access_token";

/// Authentication middleware that validates JWT tokens and injects user info
pub struct AuthMiddleware;

impl AuthMiddleware {
    /// Middleware function for validating JWT tokens
    pub async fn validate_token(
        State(jwt_service): State<Arc<JwtService>>,
        mut req: Request,
        next: Next,
    ) -> Response {
        let Some(token) = extract_token(&req) else {
            tracing::warn!(
                "[AuthMiddleware] Missing access token for {} {}",
                req.method(),
                req.uri()
            );
            return unauthorized("Access token was not informed.");
        };

        let claims = match jwt_service.decode_claims(&token) {
            Ok(claims) => claims,
            Err(e) => {
                tracing::warn!("[AuthMiddleware] JWT validation failed: {:#}", e);
                return unauthorized("Invalid access token.");
            }
        };

        tracing::debug!(user_id = %claims.auth_user.id, "[AuthMiddleware] AuthUser injected");
        req.extensions_mut().insert(claims.auth_user);

        next.run(req).await
    }
}

/// Read the token from `Authorization` (with or without the Bearer scheme),
/// falling back to the `access_token` cookie.
fn extract_token(req: &Request) -> Option<String> {
    let from_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(|value| {
            let value = value.trim();
            match value.split_once(' ') {
                Some((scheme, token)) if scheme.eq_ignore_ascii_case("bearer") => token.trim(),
                _ if value.eq_ignore_ascii_case("bearer") => "",
                _ => value,
            }
        })
        .filter(|token| !token.is_empty())
        .map(str::to_string);

    from_header.or_else(|| {
        CookieJar::from_headers(req.headers())
            .get(ACCESS_TOKEN_COOKIE)
            .map(|cookie| cookie.value().to_string())
            .filter(|token| !token.is_empty())
    })
}

fn unauthorized(message: &str) -> Response {
    let status = StatusCode::UNAUTHORIZED;
    (
        status,
        Json(json!({ "status": status.as_u16(), "message": message })),
    )
        .into_response()
}

/// Extension trait for extracting AuthUser from request
pub trait RequestAuthExt {
    fn auth_user(&self) -> Option<&AuthUser>;
}

impl RequestAuthExt for Request {
    fn auth_user(&self) -> Option<&AuthUser> {
        self.extensions().get::<AuthUser>()
    }
}
