//! User routes: profile lookup and login

use axum::{
    Json, Router,
    extract::{Path, Request, State, rejection::JsonRejection},
    http::HeaderMap,
    middleware,
    routing::{get, post},
};
use std::sync::Arc;

use crate::auth::errors::ServiceResult;
use crate::auth::jwt::JwtService;
use crate::auth::middleware::{AuthMiddleware, RequestAuthExt};
use crate::auth::models::{Correlation, LoginRequest, TokenResponse, UserResponse};
use crate::server::AppState;

/// `GET /users/{email}`: the caller's own profile.
pub async fn find_by_email(
    State(app_state): State<AppState>,
    Path(email): Path<String>,
    req: Request,
) -> ServiceResult<UserResponse> {
    let auth_user = req.auth_user().cloned();
    app_state
        .user_service
        .find_by_email(Some(&email), auth_user.as_ref())
        .await
}

/// `POST /login`: exchange email and password for an access token.
///
/// An unreadable body is handled like an empty one so the caller still gets
/// the regular `{status, message}` envelope.
pub async fn login(
    State(app_state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> ServiceResult<TokenResponse> {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            tracing::debug!("Unreadable login body: {}", rejection.body_text());
            LoginRequest::default()
        }
    };
    let correlation = Correlation::from_headers(&headers);
    app_state
        .user_service
        .get_access_token(request, &correlation)
        .await
}

pub fn create_user_routes(jwt_service: Arc<JwtService>) -> Router<AppState> {
    let protected = Router::new()
        .route("/users/{email}", get(find_by_email))
        .layer(middleware::from_fn_with_state(
            jwt_service,
            AuthMiddleware::validate_token,
        ));

    Router::new().route("/login", post(login)).merge(protected)
}
