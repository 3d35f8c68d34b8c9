//! Routes for the authenticated caller (`/me`).
//!
//! - `GET /me` → `get_me`
//! - `GET /me/qrcode` → `get_my_qrcode`

pub mod get;

use axum::{Router, routing::get};
use util::state::AppState;

use get::{get_me, get_my_qrcode};

pub fn me_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get_me))
        .route("/qrcode", get(get_my_qrcode))
}
