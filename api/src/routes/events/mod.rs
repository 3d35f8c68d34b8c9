//! # events Routes Module
//!
//! Routes for the `/events` endpoint group. The group is mounted behind
//! `allow_authenticated`; creation and per-event attendance listings are limited to staff.
//!
//! - `GET /events` → `list_events`
//! - `GET /events/my` → `my_events`
//! - `POST /events` → `create_event` (staff)
//! - `GET /events/{event_id}` → `get_event`
//! - `PUT /events/{event_id}` → `update_event`
//! - `DELETE /events/{event_id}` → `delete_event`
//! - `GET /events/{event_id}/qrcode` → `get_event_qrcode`
//! - `GET /events/{event_id}/attendance` → `get_event_attendance` (staff)

pub mod delete;
pub mod get;
pub mod post;
pub mod put;

use axum::{
    Router,
    middleware::from_fn,
    routing::{get, post},
};
use util::state::AppState;

use crate::auth::guards::allow_staff;

use delete::delete_event;
use get::{get_event, get_event_attendance, get_event_qrcode, list_events, my_events};
use post::create_event;
use put::update_event;

pub fn events_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_events))
        .route("/", post(create_event).route_layer(from_fn(allow_staff)))
        .route("/my", get(my_events))
        .route("/{event_id}", get(get_event).put(update_event).delete(delete_event))
        .route("/{event_id}/qrcode", get(get_event_qrcode))
        .route(
            "/{event_id}/attendance",
            get(get_event_attendance).route_layer(from_fn(allow_staff)),
        )
}
