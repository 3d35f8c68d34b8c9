use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use services::events;
use util::state::AppState;

use crate::auth::AuthUser;
use crate::auth::guards::Empty;
use crate::response::{ApiResponse, service_error};

/// DELETE /events/{event_id}
///
/// Soft-deletes an event: it is cancelled, deactivated and any rotated
/// student QR codes are restored. Creator or admin only.
///
/// ### Responses
/// - `200 OK`
/// ```json
/// { "success": true, "data": null, "message": "Event deleted successfully" }
/// ```
/// - `403 Forbidden`
/// - `404 Not Found`
pub async fn delete_event(
    State(app_state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(event_id): Path<i64>,
) -> impl IntoResponse {
    match events::delete_event(&app_state, event_id, &auth.actor(), Utc::now()).await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse::<Empty>::success(Empty, "Event deleted successfully")),
        ),
        Err(e) => service_error(e),
    }
}
