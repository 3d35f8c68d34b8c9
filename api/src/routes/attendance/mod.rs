//! # attendance Routes Module
//!
//! Routes for the `/attendance` endpoint group, mounted behind `allow_authenticated`.
//!
//! - `POST /attendance/mark` → `mark_attendance`
//! - `GET /attendance/my` → `my_attendance`
//! - `GET /attendance/stats` → `attendance_stats`
//! - `PUT /attendance/{attendance_id}/status` → `update_attendance_status` (staff)

pub mod get;
pub mod post;
pub mod put;

use axum::{
    Router,
    middleware::from_fn,
    routing::{get, post, put},
};
use util::state::AppState;

use crate::auth::guards::allow_staff;

use get::{attendance_stats, my_attendance};
use post::mark_attendance;
use put::update_attendance_status;

pub fn attendance_routes() -> Router<AppState> {
    Router::new()
        .route("/mark", post(mark_attendance))
        .route("/my", get(my_attendance))
        .route("/stats", get(attendance_stats))
        .route(
            "/{attendance_id}/status",
            put(update_attendance_status).route_layer(from_fn(allow_staff)),
        )
}
