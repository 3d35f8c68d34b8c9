use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::Utc;
use db::models::user::Role;
use serde::Deserialize;
use services::users;
use util::state::AppState;

use crate::auth::AuthUser;
use crate::response::{ApiResponse, service_error};
use crate::routes::common::UserResponse;

#[derive(Debug, Deserialize)]
pub struct UpdateRoleRequest {
    pub role: Role,
}

/// PUT /admin/users/{student_id}/role
///
/// Changes a user's role to `student`, `faculty` or `admin`.
///
/// ### Responses
/// - `200 OK` with the updated user
/// - `400 Bad Request` (attempt to grant superadmin)
/// - `403 Forbidden` (target is a superadmin)
/// - `404 Not Found`
pub async fn update_user_role(
    State(app_state): State<AppState>,
    Extension(auth): Extension<AuthUser>,
    Path(student_id): Path<String>,
    Json(req): Json<UpdateRoleRequest>,
) -> impl IntoResponse {
    match users::promote(app_state.db(), &auth.actor(), &student_id, req.role, Utc::now()).await {
        Ok(user) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                UserResponse::from(user),
                "User role updated successfully",
            )),
        ),
        Err(e) => service_error(e),
    }
}
