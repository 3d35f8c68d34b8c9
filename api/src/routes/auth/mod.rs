//! # auth Routes Module
//!
//! Routes for the `/auth` endpoint group. All of them are public.
//!
//! - `POST /auth/register` → `register`
//! - `POST /auth/verify` → `verify`
//! - `POST /auth/login` → `login`
//! - `POST /auth/refresh` → `refresh`

pub mod post;

use axum::{Router, routing::post};
use util::state::AppState;

use post::{login, refresh, register, verify};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register))
        .route("/verify", post(verify))
        .route("/login", post(login))
        .route("/refresh", post(refresh))
}
