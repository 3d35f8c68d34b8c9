use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
};
use db::models::user::Role;
use serde::Deserialize;
use services::users::{self, SystemStats};
use util::state::AppState;

use crate::response::{ApiResponse, service_error};
use crate::routes::common::UserResponse;

#[derive(Debug, Default, Deserialize)]
pub struct UserListQuery {
    pub role: Option<Role>,
}

/// GET /admin/users
///
/// All accounts, newest first, optionally filtered by `role`.
pub async fn list_users(
    State(app_state): State<AppState>,
    Query(query): Query<UserListQuery>,
) -> impl IntoResponse {
    match users::list_users(app_state.db(), query.role).await {
        Ok(list) => (
            StatusCode::OK,
            Json(ApiResponse::<Vec<UserResponse>>::success(
                list.into_iter().map(UserResponse::from).collect(),
                "Users retrieved successfully",
            )),
        ),
        Err(e) => service_error(e),
    }
}

/// GET /admin/stats
///
/// System-wide totals by role, by event status and for attendance records.
pub async fn system_stats(State(app_state): State<AppState>) -> impl IntoResponse {
    match users::system_stats(app_state.db()).await {
        Ok(stats) => (
            StatusCode::OK,
            Json(ApiResponse::<SystemStats>::success(
                stats,
                "System statistics retrieved successfully",
            )),
        ),
        Err(e) => service_error(e),
    }
}
