//! HTTP route entry point for `/api/...`.
//!
//! Routes are organized by domain, each protected via the appropriate
//! access-control middleware.
//!
//! Route groups:
//! - `/health` → Health check with database reachability (public)
//! - `/registration-dropdowns`, `/events/creation-dropdowns` → Department and section options (public)
//! - `/auth` → Registration, verification, login and token refresh (public)
//! - `/me` → The caller's profile and QR code (authenticated)
//! - `/events` → Event browsing and management (authenticated, some routes staff-only)
//! - `/attendance` → Marking, history and statistics (authenticated)
//! - `/admin` → User roles and system statistics (superadmin)

use crate::auth::guards::{allow_authenticated, allow_superadmin};
use crate::auth::middleware::rate_limit;
use crate::routes::{
    admin::admin_routes,
    attendance::attendance_routes,
    auth::auth_routes,
    dropdowns::{event_creation_dropdowns, registration_dropdowns},
    events::events_routes,
    health::health_routes,
    me::me_routes,
};
use axum::{
    Router,
    middleware::{from_fn, from_fn_with_state},
    routing::get,
};
use util::state::AppState;

pub mod admin;
pub mod attendance;
pub mod auth;
pub mod common;
pub mod dropdowns;
pub mod events;
pub mod health;
pub mod me;

/// Builds the complete application router for all HTTP endpoints.
///
/// Every group sits behind the per-IP rate limiter held in `app_state`.
pub fn routes(app_state: AppState) -> Router {
    Router::new()
        .nest("/health", health_routes())
        .nest("/auth", auth_routes())
        .route("/registration-dropdowns", get(registration_dropdowns))
        .route("/events/creation-dropdowns", get(event_creation_dropdowns))
        .nest("/me", me_routes().route_layer(from_fn(allow_authenticated)))
        .nest("/events", events_routes().route_layer(from_fn(allow_authenticated)))
        .nest(
            "/attendance",
            attendance_routes().route_layer(from_fn(allow_authenticated)),
        )
        .nest("/admin", admin_routes().route_layer(from_fn(allow_superadmin)))
        .layer(from_fn_with_state(app_state.clone(), rate_limit))
        .with_state(app_state)
}
