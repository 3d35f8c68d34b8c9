use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use db::models::attendance;
use services::events::{self, EventFilter, EventQr, EventView, StudentEventView};
use services::attendance as attendance_service;
use util::state::AppState;

use crate::auth::AuthUser;
use crate::response::{ApiResponse, service_error};

/// GET /events
///
/// Lists events, newest date first. Every filter is optional.
///
/// ### Query Parameters
/// - `course`, `section`, `year_level`: exact match (course is case-insensitive)
/// - `status`: `scheduled` | `ongoing` | `completed` | `cancelled`
/// - `is_active`: `true` | `false`
///
/// ### Responses
/// - `200 OK` with a list of events, each carrying `attendee_count`
/// - `400 Bad Request` (unknown status value)
pub async fn list_events(
    State(app_state): State<AppState>,
    Query(filter): Query<EventFilter>,
) -> impl IntoResponse {
    match events::list_events(app_state.db(), &filter, Utc::now()).await {
        Ok(list) => (
            StatusCode::OK,
            Json(ApiResponse::<Vec<EventView>>::success(
                list,
                "Events retrieved successfully",
            )),
        ),
        Err(e) => service_error(e),
    }
}

/// GET /events/my
///
/// Active events as the caller sees them, each flagged with whether the
/// caller's course is on the event's allow-list.
pub async fn my_events(
    State(app_state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
) -> impl IntoResponse {
    match events::events_for_student(app_state.db(), &claims.sub, Utc::now()).await {
        Ok(list) => (
            StatusCode::OK,
            Json(ApiResponse::<Vec<StudentEventView>>::success(
                list,
                "Events retrieved successfully",
            )),
        ),
        Err(e) => service_error(e),
    }
}

/// GET /events/{event_id}
///
/// ### Responses
/// - `200 OK`
/// - `404 Not Found`
pub async fn get_event(
    State(app_state): State<AppState>,
    Path(event_id): Path<i64>,
) -> impl IntoResponse {
    match events::get_event(app_state.db(), event_id, Utc::now()).await {
        Ok(view) => (
            StatusCode::OK,
            Json(ApiResponse::<Option<EventView>>::success(
                Some(view),
                "Event retrieved successfully",
            )),
        ),
        Err(e) => service_error(e),
    }
}

/// GET /events/{event_id}/qrcode
///
/// Returns the event's QR image, generating and storing it on first request.
pub async fn get_event_qrcode(
    State(app_state): State<AppState>,
    Path(event_id): Path<i64>,
) -> impl IntoResponse {
    match events::event_qr_code(app_state.db(), event_id, Utc::now()).await {
        Ok(qr) => (
            StatusCode::OK,
            Json(ApiResponse::<Option<EventQr>>::success(
                Some(qr),
                "Event QR code retrieved successfully",
            )),
        ),
        Err(e) => service_error(e),
    }
}

/// GET /events/{event_id}/attendance
///
/// All attendance records for an event, most recent first. Staff only.
pub async fn get_event_attendance(
    State(app_state): State<AppState>,
    Path(event_id): Path<i64>,
) -> impl IntoResponse {
    match attendance_service::list_for_event(app_state.db(), event_id).await {
        Ok(records) => (
            StatusCode::OK,
            Json(ApiResponse::<Vec<attendance::Model>>::success(
                records,
                "Attendance records retrieved successfully",
            )),
        ),
        Err(e) => service_error(e),
    }
}
