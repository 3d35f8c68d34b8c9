use sea_orm::DbErr;
use thiserror::Error;
use validator::ValidationErrors;

/// Failure of a domain operation.
///
/// Every variant is a client-correctable condition except `Database` and
/// `Internal`. None of them is fatal to the process.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    /// Role or ownership failure.
    #[error("{0}")]
    AccessDenied(String),

    /// The target student has no course; an admin must fix the profile.
    #[error("student course is not set. contact admin")]
    CourseNotSet,

    /// Course/year/department gating rejected the student.
    #[error("Not Authorized to scan QR Code")]
    NotAuthorizedToScan,

    #[error("{0}")]
    Conflict(String),

    /// Action not valid for the current lifecycle state.
    #[error("{0}")]
    State(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("{0}")]
    Forbidden(String),

    #[error("database error: {0}")]
    Database(#[from] DbErr),

    #[error("{0}")]
    Internal(String),
}

impl ServiceError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn access_denied(msg: impl Into<String>) -> Self {
        Self::AccessDenied(msg.into())
    }

    pub fn conflict(msg: impl Into<String>) -> Self {
        Self::Conflict(msg.into())
    }

    pub fn state(msg: impl Into<String>) -> Self {
        Self::State(msg.into())
    }
}

impl From<ValidationErrors> for ServiceError {
    fn from(errors: ValidationErrors) -> Self {
        Self::Validation(format_validation_errors(&errors))
    }
}

/// Flattens field errors into one `; `-separated message.
pub fn format_validation_errors(errors: &ValidationErrors) -> String {
    let mut messages: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(msg) => msg.to_string(),
                None => format!("{field} is invalid"),
            })
        })
        .collect();
    messages.sort();
    messages.join("; ")
}
