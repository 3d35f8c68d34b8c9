use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use chrono::Utc;
use services::attendance::{self, MarkAttendanceRequest, MarkedAttendance};
use util::state::AppState;

use crate::auth::AuthUser;
use crate::response::{ApiResponse, service_error};

/// POST /attendance/mark
///
/// Records a check-in or check-out. Students may only mark themselves; staff
/// may scan any student by passing `student_id`.
///
/// ### Request Body
/// ```json
/// {
///   "event_id": 7,
///   "student_id": "251001-0042",
///   "action": "check_in",
///   "method": "qr_scan"
/// }
/// ```
///
/// ### Responses
/// - `200 OK`
/// ```json
/// {
///   "success": true,
///   "data": {
///     "action": "check_in",
///     "attendance": { "id": 1, "status": "present", "timing_status": "on_time", ... },
///     "total_attendance_count": 4,
///     "event_attendance_count": 31
///   },
///   "message": "Check-in recorded successfully"
/// }
/// ```
/// - `400 Bad Request` (invalid action, outside the check-in window, already checked in/out,
///   inactive event, student has no course)
/// - `403 Forbidden` (not allowed to scan for others, course not tagged)
/// - `404 Not Found` (event or student)
pub async fn mark_attendance(
    State(app_state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Json(req): Json<MarkAttendanceRequest>,
) -> impl IntoResponse {
    match attendance::mark_attendance(&app_state, req, &auth.actor(), Utc::now()).await {
        Ok(marked) => {
            let message = match marked.action {
                attendance::AttendanceAction::CheckIn => "Check-in recorded successfully",
                attendance::AttendanceAction::CheckOut => "Check-out recorded successfully",
            };
            (
                StatusCode::OK,
                Json(ApiResponse::<Option<MarkedAttendance>>::success(Some(marked), message)),
            )
        }
        Err(e) => service_error(e),
    }
}
