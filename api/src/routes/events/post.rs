use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use chrono::Utc;
use db::models::event;
use services::events::{self, CreateEventRequest};
use util::state::AppState;

use crate::auth::AuthUser;
use crate::response::{ApiResponse, service_error};

/// POST /events
///
/// Create an event. Faculty, admin and superadmin only.
///
/// Times accept RFC 3339, `YYYY-MM-DDTHH:MM:SS` or `HH:MM` (on `event_date`).
/// `tagged_courses` restricts scanning to students of those courses; while the
/// event runs, their personal QR codes rotate to the event.
///
/// ### Request Body
/// ```json
/// {
///   "title": "Orientation",
///   "event_date": "2025-10-01",
///   "start_time": "09:00",
///   "end_time": "11:00",
///   "location": "Main Hall",
///   "tagged_courses": ["BSIT", "BSCS"]
/// }
/// ```
///
/// ### Responses
/// - `201 Created`
/// - `400 Bad Request` (bad dates, end before start, missing title)
/// - `403 Forbidden`
pub async fn create_event(
    State(app_state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(req): Json<CreateEventRequest>,
) -> impl IntoResponse {
    match events::create_event(&app_state, req, &auth.actor(), Utc::now()).await {
        Ok(created) => (
            StatusCode::CREATED,
            Json(ApiResponse::<Option<event::Model>>::success(
                Some(created),
                "Event created successfully",
            )),
        ),
        Err(e) => service_error(e),
    }
}
