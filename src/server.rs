//! # Server Module
//!
//! HTTP server setup and route configuration for the auth API.

use anyhow::{Context, Result};
use axum::{
    Router,
    http::{HeaderName, HeaderValue, Method, header},
    routing::get,
};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

use crate::auth::jwt::JwtService;
use crate::auth::password::{Argon2Verifier, PasswordVerifier};
use crate::auth::service::UserService;
use crate::config::Config;
use crate::database::{DatabaseConnection, UserRepository, migrations, seed};
use crate::routes::{health, user};

/// Application state shared across all route handlers
#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<UserService>,
    pub jwt_service: Arc<JwtService>,
    pub repository: Arc<dyn UserRepository>,
}

impl AppState {
    /// Wire the user service to its collaborators.
    pub fn new(
        repository: Arc<dyn UserRepository>,
        verifier: Arc<dyn PasswordVerifier>,
        jwt_service: Arc<JwtService>,
    ) -> Self {
        let user_service = Arc::new(UserService::new(
            repository.clone(),
            verifier,
            jwt_service.clone(),
        ));
        Self {
            user_service,
            jwt_service,
            repository,
        }
    }
}

/// Build the application router with CORS for the given origins.
pub fn build_router(app_state: AppState, allowed_origins: &[String]) -> Result<Router> {
    let origins = allowed_origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .with_context(|| format!("Invalid CORS origin: {origin}"))
        })
        .collect::<Result<Vec<_>>>()?;

    let cors = CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            header::ORIGIN,
            header::CONTENT_TYPE,
            header::ACCEPT,
            header::AUTHORIZATION,
            HeaderName::from_static("transactionid"),
            HeaderName::from_static("serviceid"),
        ]);

    Ok(Router::new()
        .route("/ping", get(health::ping))
        .route("/health", get(health::health))
        .merge(user::create_user_routes(app_state.jwt_service.clone()))
        .layer(cors)
        .with_state(app_state))
}

/// Connects to the database, optionally seeds it, and serves until terminated.
pub async fn start(config: Config) -> Result<()> {
    let db = Arc::new(DatabaseConnection::new(config.database.clone()).await?);
    migrations::run_migrations(db.pool()).await?;

    let verifier = Arc::new(Argon2Verifier::new());
    if config.seed_initial_data {
        seed::seed_initial_data(db.pool(), &verifier).await?;
    }

    let jwt_service = Arc::new(JwtService::new(&config.auth.api_secret));
    let app_state = AppState::new(db, verifier, jwt_service);
    let app = build_router(app_state, &config.server.allowed_origins)?;

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {addr} - port may already be in use"))?;

    tracing::info!("🚀 Auth API listening on http://{}", addr);
    tracing::info!("🏥 Health check available at http://{}/ping", addr);

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::models::AuthUser;
    use crate::auth::password::test_verifier;
    use crate::database::UserRecord;
    use crate::database::repository::{InMemoryUserRepository, UnavailableUserRepository};
    use crate::database::seed::{SEED_PASSWORD, build_initial_data};
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    const SECRET: &str = "router_test_secret";

    struct TestApp {
        router: Router,
        jwt: JwtService,
        users: Vec<UserRecord>,
    }

    async fn test_app() -> TestApp {
        let verifier = test_verifier();
        let users = build_initial_data(&verifier).await.unwrap().users;
        let repository = Arc::new(InMemoryUserRepository::new(users.clone()));
        let state = AppState::new(
            repository,
            Arc::new(verifier),
            Arc::new(JwtService::new(SECRET)),
        );
        let router = build_router(state, &["http://localhost:3000".to_string()]).unwrap();
        TestApp {
            router,
            jwt: JwtService::new(SECRET),
            users,
        }
    }

    async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    fn login_request(body: Value) -> Request<Body> {
        Request::post("/login")
            .header("content-type", "application/json")
            .header("transactionid", "tx-1")
            .header("serviceid", "auth-tests")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn lookup_request(email: &str, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::get(format!("/users/{email}"));
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {token}"));
        }
        builder.body(Body::empty()).unwrap()
    }

    fn token_for(app: &TestApp, user: &UserRecord) -> String {
        app.jwt.create_token(user.auth_user()).unwrap()
    }

    #[tokio::test]
    async fn test_ping() {
        let app = test_app().await;
        let (status, body) = send(&app.router, Request::get("/ping").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "status": "pong" }));
    }

    #[tokio::test]
    async fn test_health_reports_store_failure() {
        let state = AppState::new(
            Arc::new(UnavailableUserRepository),
            Arc::new(test_verifier()),
            Arc::new(JwtService::new(SECRET)),
        );
        let router = build_router(state, &[]).unwrap();
        let (status, body) = send(&router, Request::get("/health").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            body,
            json!({ "status": "unavailable", "message": "Credential store is unavailable." })
        );
    }

    #[tokio::test]
    async fn test_login_with_seeded_user() {
        let app = test_app().await;
        let (status, body) = send(
            &app.router,
            login_request(json!({ "email": "usertest@gmail.com", "password": SEED_PASSWORD })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], 200);
        let token = body["accessToken"].as_str().unwrap();
        let claims = app.jwt.decode_claims(token).unwrap();
        assert_eq!(claims.auth_user, app.users[0].auth_user());
    }

    #[tokio::test]
    async fn test_login_failures_keep_envelope() {
        let app = test_app().await;

        let (status, body) = send(
            &app.router,
            login_request(json!({ "email": "usertest@gmail.com", "password": "nope" })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body, json!({ "status": 401, "message": "Password doesn't match." }));

        let (status, body) = send(&app.router, login_request(json!({ "email": "usertest@gmail.com" }))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Email and password must be informed.");

        let (status, body) = send(
            &app.router,
            login_request(json!({ "email": "missing@gmail.com", "password": SEED_PASSWORD })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "User was not found.");
    }

    #[tokio::test]
    async fn test_login_with_unreadable_body() {
        let app = test_app().await;
        let request = Request::post("/login")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();
        let (status, body) = send(&app.router, request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Email and password must be informed.");
    }

    #[tokio::test]
    async fn test_lookup_requires_token() {
        let app = test_app().await;
        let (status, body) = send(&app.router, lookup_request("usertest@gmail.com", None)).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Access token was not informed.");
    }

    #[tokio::test]
    async fn test_lookup_rejects_foreign_signature() {
        let app = test_app().await;
        let forged = JwtService::new("someone_else").create_token(app.users[0].auth_user()).unwrap();
        let (status, body) = send(&app.router, lookup_request("usertest@gmail.com", Some(&forged))).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Invalid access token.");
    }

    #[tokio::test]
    async fn test_lookup_own_profile() {
        let app = test_app().await;
        let token = token_for(&app, &app.users[0]);
        let (status, body) = send(&app.router, lookup_request("usertest@gmail.com", Some(&token))).await;

        assert_eq!(status, StatusCode::OK);
        let expected: AuthUser = app.users[0].auth_user();
        assert_eq!(
            body,
            json!({
                "status": 200,
                "user": { "id": expected.id, "name": expected.name, "email": expected.email }
            })
        );
    }

    #[tokio::test]
    async fn test_lookup_someone_else_is_forbidden() {
        let app = test_app().await;
        let token = token_for(&app, &app.users[0]);
        let (status, body) = send(&app.router, lookup_request("usertest2@gmail.com", Some(&token))).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(body["message"], "You cannot see this user data.");
    }

    #[tokio::test]
    async fn test_lookup_unknown_email() {
        let app = test_app().await;
        let token = token_for(&app, &app.users[1]);
        let (status, body) = send(&app.router, lookup_request("ghost@gmail.com", Some(&token))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "User was not found.");
    }

    struct RejectingVerifier;

    #[async_trait::async_trait]
    impl PasswordVerifier for RejectingVerifier {
        async fn verify(&self, _password: &str, _password_hash: &str) -> anyhow::Result<bool> {
            Ok(false)
        }
    }

    #[tokio::test]
    async fn test_state_uses_injected_verifier() {
        let users = build_initial_data(&test_verifier()).await.unwrap().users;
        let state = AppState::new(
            Arc::new(InMemoryUserRepository::new(users)),
            Arc::new(RejectingVerifier),
            Arc::new(JwtService::new(SECRET)),
        );
        let router = build_router(state, &[]).unwrap();
        let (status, body) = send(
            &router,
            login_request(json!({ "email": "usertest@gmail.com", "password": SEED_PASSWORD })),
        )
        .await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["message"], "Password doesn't match.");
    }

    #[test]
    fn test_invalid_cors_origin_is_rejected() {
        let state = AppState::new(
            Arc::new(InMemoryUserRepository::default()),
            Arc::new(test_verifier()),
            Arc::new(JwtService::new(SECRET)),
        );
        assert!(build_router(state, &["bad\norigin".to_string()]).is_err());
    }
}
