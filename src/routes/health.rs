use axum::{extract::State, http::StatusCode, response::Json};
use serde_json::json;

use crate::server::AppState;

/// Liveness probe.
///
/// # Route
/// - **Method**: GET
/// - **Path**: `/ping`
/// - **Response**: `{"status": "pong"}`
pub async fn ping() -> Json<serde_json::Value> {
    Json(json!({ "status": "pong" }))
}

/// Readiness probe: checks that the credential store answers.
///
/// # Route
/// - **Method**: GET
/// - **Path**: `/health`
///
/// # HTTP Status Codes
/// - **200 OK**: `{"status": "ok"}`
/// - **500 Internal Server Error**: `{"status": "unavailable", "message": ...}`;
///   the underlying error is only logged
pub async fn health(State(app_state): State<AppState>) -> (StatusCode, Json<serde_json::Value>) {
    match app_state.repository.health_check().await {
        Ok(()) => (StatusCode::OK, Json(json!({ "status": "ok" }))),
        Err(e) => {
            tracing::error!("Health check failed: {:#}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "status": "unavailable", "message": "Credential store is unavailable." })),
            )
        }
    }
}
