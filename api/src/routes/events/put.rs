use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use db::models::event;
use services::events::{self, UpdateEventRequest};
use util::state::AppState;

use crate::auth::AuthUser;
use crate::response::{ApiResponse, service_error};

/// PUT /events/{event_id}
///
/// Partially update an event. Allowed for its creator and for staff.
/// Rescheduling recomputes the status and reschedules QR rotation.
///
/// ### Responses
/// - `200 OK`
/// - `400 Bad Request`
/// - `403 Forbidden`
/// - `404 Not Found`
pub async fn update_event(
    State(app_state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(event_id): Path<i64>,
    Json(req): Json<UpdateEventRequest>,
) -> impl IntoResponse {
    match events::update_event(&app_state, event_id, req, &auth.actor(), Utc::now()).await {
        Ok(updated) => (
            StatusCode::OK,
            Json(ApiResponse::<Option<event::Model>>::success(
                Some(updated),
                "Event updated successfully",
            )),
        ),
        Err(e) => service_error(e),
    }
}
