use crate::response::ApiResponse;
use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::get};
use serde::Serialize;
use util::state::AppState;

/// Builds the `/health` route group with a single public `GET /health`.
pub fn health_routes() -> Router<AppState> {
    Router::new().route("/", get(health_check))
}

#[derive(Debug, Serialize, Default)]
pub struct HealthStatus {
    pub status: &'static str,
    pub database: &'static str,
}

/// GET /health
///
/// Reports whether the API is up and can reach its database.
///
/// ### Responses
/// - `200 OK`
/// ```json
/// {
///   "success": true,
///   "data": { "status": "OK", "database": "reachable" },
///   "message": "Health check passed"
/// }
/// ```
/// - `503 Service Unavailable` when the database does not answer a ping
async fn health_check(State(app_state): State<AppState>) -> impl IntoResponse {
    match app_state.db().ping().await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                HealthStatus {
                    status: "OK",
                    database: "reachable",
                },
                "Health check passed",
            )),
        ),
        Err(e) => {
            tracing::error!(error = %e, "Health check database ping failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(ApiResponse {
                    success: false,
                    data: HealthStatus {
                        status: "DEGRADED",
                        database: "unreachable",
                    },
                    message: "Database unavailable".into(),
                }),
            )
        }
    }
}
