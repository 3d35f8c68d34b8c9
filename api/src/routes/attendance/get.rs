use axum::{
    Extension, Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use db::models::attendance;
use serde::Deserialize;
use services::attendance::{self as attendance_service, StudentAttendanceFilter};
use services::stats::{self, AttendanceStats};
use util::state::AppState;

use crate::auth::AuthUser;
use crate::response::{ApiResponse, service_error};

/// GET /attendance/my
///
/// The caller's own attendance history, newest first.
///
/// ### Query Parameters
/// - `event_id` *(optional)*
/// - `status` *(optional)*: `present` | `absent` | `late` | `excused`
/// - `start_date`, `end_date` *(optional, inclusive, `YYYY-MM-DD`)*
pub async fn my_attendance(
    State(app_state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Query(filter): Query<StudentAttendanceFilter>,
) -> impl IntoResponse {
    match attendance_service::list_for_student(app_state.db(), &claims.sub, &filter).await {
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

#[derive(Debug, Default, Deserialize)]
pub struct StatsQuery {
    pub student_id: Option<String>,
    pub event_id: Option<i64>,
}

/// GET /attendance/stats
///
/// Status counts and attendance rate. Students always get their own figures;
/// asking for another student is refused. Staff may narrow by `student_id`
/// and/or `event_id`, or omit both for system-wide numbers.
///
/// ### Responses
/// - `200 OK`
/// ```json
/// {
///   "success": true,
///   "data": {
///     "total_events": 10,
///     "present_count": 6,
///     "absent_count": 1,
///     "late_count": 2,
///     "excused_count": 1,
///     "attendance_rate": 90.0
///   },
///   "message": "Attendance statistics retrieved successfully"
/// }
/// ```
/// - `403 Forbidden`
pub async fn attendance_stats(
    State(app_state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Query(query): Query<StatsQuery>,
) -> impl IntoResponse {
    let student_id = if claims.role.is_staff() {
        query.student_id
    } else {
        match query.student_id {
            Some(requested) if requested != claims.sub => {
                return (
                    StatusCode::FORBIDDEN,
                    Json(ApiResponse::<AttendanceStats>::error(
                        "Students can only view their own statistics",
                    )),
                );
            }
            _ => Some(claims.sub.clone()),
        }
    };

    match stats::compute_stats(app_state.db(), student_id.as_deref(), query.event_id).await {
        Ok(stats) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                stats,
                "Attendance statistics retrieved successfully",
            )),
        ),
        Err(e) => service_error(e.into()),
    }
}
