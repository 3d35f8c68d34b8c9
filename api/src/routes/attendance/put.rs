use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use db::models::attendance;
use services::attendance::{self as attendance_service, UpdateStatusRequest};
use util::state::AppState;

use crate::auth::AuthUser;
use crate::response::{ApiResponse, service_error};

/// PUT /attendance/{attendance_id}/status
///
/// Overrides a record's status, e.g. to mark an absence as excused.
///
/// ### Request Body
/// ```json
/// { "status": "excused", "notes": "Medical certificate provided" }
/// ```
pub async fn update_attendance_status(
    State(app_state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(attendance_id): Path<i64>,
    Json(req): Json<UpdateStatusRequest>,
) -> impl IntoResponse {
    match attendance_service::update_status(app_state.db(), attendance_id, req, &auth.actor(), Utc::now())
        .await
    {
        Ok(record) => (
            StatusCode::OK,
            Json(ApiResponse::<Option<attendance::Model>>::success(
                Some(record),
                "Attendance status updated successfully",
            )),
        ),
        Err(e) => service_error(e),
    }
}
