pub mod access;
pub mod attendance;
pub mod email;
pub mod error;
pub mod events;
pub mod notifications;
pub mod qr;
pub mod stats;
pub mod sweeper;
pub mod timing;
pub mod users;

pub use error::ServiceError;

use db::models::user::Role;

/// The authenticated party performing an operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub student_id: String,
    pub role: Role,
}

impl Actor {
    pub fn new(student_id: impl Into<String>, role: Role) -> Self {
        Self {
            student_id: student_id.into(),
            role,
        }
    }
}
