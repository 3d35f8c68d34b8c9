//! Response payloads shared by several route groups.

use chrono::{DateTime, Utc};
use db::models::user;
use serde::Serialize;

/// Public view of a user account.
#[derive(Debug, Serialize, Default)]
pub struct UserResponse {
    pub id: i64,
    pub student_id: String,
    pub email: String,
    pub username: String,
    pub role: String,
    pub first_name: String,
    pub last_name: String,
    pub middle_name: Option<String>,
    pub course: Option<String>,
    pub year_level: Option<String>,
    pub section: Option<String>,
    pub department: Option<String>,
    pub college: Option<String>,
    pub contact_number: Option<String>,
    pub address: Option<String>,
    pub is_verified: bool,
    pub verified_at: Option<DateTime<Utc>>,
    pub qr_type: String,
    pub active_event_id: Option<i64>,
    pub created_at: Option<DateTime<Utc>>,
}

impl From<user::Model> for UserResponse {
    fn from(user: user::Model) -> Self {
        Self {
            id: user.id,
            student_id: user.student_id,
            email: user.email,
            username: user.username,
            role: user.role.to_string(),
            first_name: user.first_name,
            last_name: user.last_name,
            middle_name: user.middle_name,
            course: user.course,
            year_level: user.year_level,
            section: user.section,
            department: user.department,
            college: user.college,
            contact_number: user.contact_number,
            address: user.address,
            is_verified: user.is_verified,
            verified_at: user.verified_at,
            qr_type: user.qr_type,
            active_event_id: user.active_event_id,
            created_at: Some(user.created_at),
        }
    }
}
