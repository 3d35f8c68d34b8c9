use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use util::constants::{DEPARTMENTS, SECTIONS};

use crate::response::ApiResponse;

#[derive(Debug, Serialize, Default)]
pub struct DropdownOptions {
    pub departments: Vec<&'static str>,
    pub sections: Vec<&'static str>,
}

impl DropdownOptions {
    fn all() -> Self {
        Self {
            departments: DEPARTMENTS.to_vec(),
            sections: SECTIONS.to_vec(),
        }
    }
}

/// GET /registration-dropdowns
///
/// Department and section choices for the registration form. Public.
///
/// ### Response
/// - `200 OK`
/// ```json
/// {
///   "success": true,
///   "data": {
///     "departments": ["College of Education", "..."],
///     "sections": ["Section 1", "..."]
///   },
///   "message": "Registration options retrieved successfully"
/// }
/// ```
pub async fn registration_dropdowns() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(ApiResponse::success(
            DropdownOptions::all(),
            "Registration options retrieved successfully",
        )),
    )
}

/// GET /events/creation-dropdowns
///
/// Same lists, for the event creation form. Public.
pub async fn event_creation_dropdowns() -> impl IntoResponse {
    (
        StatusCode::OK,
        Json(ApiResponse::success(
            DropdownOptions::all(),
            "Event options retrieved successfully",
        )),
    )
}
