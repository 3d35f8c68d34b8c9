use axum::{Extension, Json, extract::State, http::StatusCode, response::IntoResponse};
use services::users::{self, QrIdentity};
use util::state::AppState;

use crate::auth::AuthUser;
use crate::response::{ApiResponse, service_error};
use crate::routes::common::UserResponse;

/// GET /me
///
/// Returns the profile of the authenticated user.
pub async fn get_me(
    State(app_state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
) -> impl IntoResponse {
    match users::get_user(app_state.db(), &claims.sub).await {
        Ok(user) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                UserResponse::from(user),
                "User data retrieved successfully",
            )),
        ),
        Err(e) => service_error(e),
    }
}

/// GET /me/qrcode
///
/// Returns the caller's current QR payload. While a tagged event holds the
/// caller's slot, `qr_type` is `event:<id>` and `active_event_id` is set.
///
/// ### Responses
/// - `200 OK`
/// ```json
/// {
///   "success": true,
///   "data": {
///     "student_id": "251001-0042",
///     "qr_code_data": "data:image/svg+xml;base64,...",
///     "qr_type": "event:7",
///     "active_event_id": 7,
///     "qr_generated_at": "2025-10-01T08:00:00Z"
///   },
///   "message": "QR code retrieved successfully"
/// }
/// ```
pub async fn get_my_qrcode(
    State(app_state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
) -> impl IntoResponse {
    match users::qr_identity(app_state.db(), &claims.sub).await {
        Ok(identity) => (
            StatusCode::OK,
            Json(ApiResponse::<Option<QrIdentity>>::success(
                Some(identity),
                "QR code retrieved successfully",
            )),
        ),
        Err(e) => service_error(e),
    }
}
