use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use services::{error::format_validation_errors, users};
use util::state::AppState;
use validator::Validate;

use crate::auth::{TokenType, decode_token, generate_access_token, generate_refresh_token};
use crate::response::{ApiResponse, service_error};
use crate::routes::common::UserResponse;

/// POST /auth/register
///
/// Register a new student account. The account starts unverified and a
/// six-digit verification code is emailed to the given address.
///
/// ### Request Body
/// ```json
/// {
///   "email": "student@example.com",
///   "password": "strongpassword",
///   "first_name": "Ada",
///   "last_name": "Lovelace",
///   "course": "CS",
///   "year_level": "2"
/// }
/// ```
///
/// ### Responses
///
/// - `201 Created` with the created user
/// - `400 Bad Request` (validation failure)
/// ```json
/// {
///   "success": false,
///   "data": { ... },
///   "message": "Invalid email format"
/// }
/// ```
/// - `409 Conflict` (duplicate email or student id)
pub async fn register(
    State(app_state): State<AppState>,
    Json(req): Json<users::RegisterRequest>,
) -> impl IntoResponse {
    match users::register(&app_state, req, Utc::now()).await {
        Ok(user) => (
            StatusCode::CREATED,
            Json(ApiResponse::success(
                UserResponse::from(user),
                "Registration successful. Check your email for the verification code",
            )),
        ),
        Err(e) => service_error(e),
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct VerifyRequest {
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(equal = 6, message = "verification code must be 6 digits"))]
    pub code: String,
}

/// POST /auth/verify
///
/// Confirms the emailed code, marks the account verified and issues its QR code.
pub async fn verify(
    State(app_state): State<AppState>,
    Json(req): Json<VerifyRequest>,
) -> impl IntoResponse {
    if let Err(validation_errors) = req.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<UserResponse>::error(format_validation_errors(
                &validation_errors,
            ))),
        );
    }

    match users::verify(app_state.db(), &req.email, &req.code, Utc::now()).await {
        Ok(user) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                UserResponse::from(user),
                "Account verified successfully",
            )),
        ),
        Err(e) => service_error(e),
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    /// Student id or email.
    #[validate(length(min = 1, message = "identifier is required"))]
    pub identifier: String,
    #[validate(length(min = 1, message = "password is required"))]
    pub password: String,
}

#[derive(Debug, Serialize, Default)]
pub struct LoginResponse {
    pub user: UserResponse,
    pub access_token: String,
    pub access_expires_at: String,
    pub refresh_token: String,
    pub refresh_expires_at: String,
}

/// POST /auth/login
///
/// Authenticate with a student id or email and a password.
///
/// ### Responses
///
/// - `200 OK`
/// ```json
/// {
///   "success": true,
///   "data": {
///     "user": { "student_id": "251001-0042", "role": "student", ... },
///     "access_token": "jwt_token_here",
///     "access_expires_at": "2025-10-01T08:15:00+00:00",
///     "refresh_token": "jwt_token_here",
///     "refresh_expires_at": "2025-10-08T08:00:00+00:00"
///   },
///   "message": "Login successful"
/// }
/// ```
/// - `401 Unauthorized` (invalid credentials)
/// - `403 Forbidden` (account not verified)
pub async fn login(
    State(app_state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> impl IntoResponse {
    if let Err(validation_errors) = req.validate() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<LoginResponse>::error(format_validation_errors(
                &validation_errors,
            ))),
        );
    }

    let user = match users::authenticate(app_state.db(), &req.identifier, &req.password).await {
        Ok(user) => user,
        Err(e) => return service_error(e),
    };

    let access = generate_access_token(&user.student_id, &user.email, user.role);
    let refresh = generate_refresh_token(&user.student_id, &user.email, user.role);
    let ((access_token, access_expires_at), (refresh_token, refresh_expires_at)) = match (access, refresh) {
        (Ok(access), Ok(refresh)) => (access, refresh),
        (Err(e), _) | (_, Err(e)) => {
            tracing::error!(error = %e, "Token encoding failed");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Failed to issue tokens")),
            );
        }
    };

    tracing::info!(student_id = %user.student_id, "Login successful");

    (
        StatusCode::OK,
        Json(ApiResponse::success(
            LoginResponse {
                user: UserResponse::from(user),
                access_token,
                access_expires_at,
                refresh_token,
                refresh_expires_at,
            },
            "Login successful",
        )),
    )
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize, Default)]
pub struct RefreshResponse {
    pub access_token: String,
    pub access_expires_at: String,
}

/// POST /auth/refresh
///
/// Exchanges a valid refresh token for a new access token.
pub async fn refresh(
    State(app_state): State<AppState>,
    Json(req): Json<RefreshRequest>,
) -> impl IntoResponse {
    let claims = match decode_token(&req.refresh_token) {
        Ok(claims) if claims.token_type == TokenType::Refresh => claims,
        _ => {
            return (
                StatusCode::UNAUTHORIZED,
                Json(ApiResponse::<RefreshResponse>::error("Invalid or expired refresh token")),
            );
        }
    };

    // Role comes from the stored account, not the presented token.
    let user = match users::get_user(app_state.db(), &claims.sub).await {
        Ok(user) => user,
        Err(_) => {
            return (
                StatusCode::UNAUTHORIZED,
                Json(ApiResponse::error("Invalid or expired refresh token")),
            );
        }
    };

    match generate_access_token(&user.student_id, &user.email, user.role) {
        Ok((access_token, access_expires_at)) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                RefreshResponse {
                    access_token,
                    access_expires_at,
                },
                "Token refreshed",
            )),
        ),
        Err(e) => {
            tracing::error!(error = %e, "Token encoding failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Failed to issue tokens")),
            )
        }
    }
}
