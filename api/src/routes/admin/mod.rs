//! # admin Routes Module
//!
//! Superadmin-only routes, mounted behind `allow_superadmin`.
//!
//! - `GET /admin/users` → `list_users`
//! - `PUT /admin/users/{student_id}/role` → `update_user_role`
//! - `GET /admin/stats` → `system_stats`

pub mod get;
pub mod put;

use axum::{
    Router,
    routing::{get, put},
};
use util::state::AppState;

use get::{list_users, system_stats};
use put::update_user_role;

pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/{student_id}/role", put(update_user_role))
        .route("/stats", get(system_stats))
}
