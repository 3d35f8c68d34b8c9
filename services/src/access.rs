//! Course-based eligibility of a student for an event.
//!
//! The evaluator is pure: it only looks at the event's restrictions and the
//! target student's academic profile. The acting user never matters here.

use db::models::{
    event::{self, split_courses},
    user::{self, Role},
};

use crate::error::ServiceError;

/// Why a student may not scan for an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDenial {
    CourseNotSet,
    NotAuthorizedToScan,
}

impl From<AccessDenial> for ServiceError {
    fn from(denial: AccessDenial) -> Self {
        match denial {
            AccessDenial::CourseNotSet => ServiceError::CourseNotSet,
            AccessDenial::NotAuthorizedToScan => ServiceError::NotAuthorizedToScan,
        }
    }
}

/// Restrictions carried by an event, already normalized.
#[derive(Debug, Clone, Default)]
pub struct EventScope {
    pub course: Option<String>,
    pub year_level: Option<String>,
    pub department: Option<String>,
    pub tagged_courses: Vec<String>,
}

/// The parts of a user profile that gating looks at, already normalized.
#[derive(Debug, Clone)]
pub struct StudentProfile {
    pub role: Role,
    pub course: Option<String>,
    pub year_level: Option<String>,
    pub department: Option<String>,
}

fn normalized(value: Option<&str>) -> Option<String> {
    value
        .map(|v| v.trim().to_uppercase())
        .filter(|v| !v.is_empty())
}

impl From<&event::Model> for EventScope {
    fn from(event: &event::Model) -> Self {
        Self {
            course: normalized(event.course.as_deref()),
            year_level: normalized(event.year_level.as_deref()),
            department: normalized(event.department.as_deref()),
            tagged_courses: split_courses(event.tagged_courses.as_deref()),
        }
    }
}

impl From<&user::Model> for StudentProfile {
    fn from(user: &user::Model) -> Self {
        Self {
            role: user.role,
            course: normalized(user.course.as_deref()),
            year_level: normalized(user.year_level.as_deref()),
            department: normalized(user.department.as_deref()),
        }
    }
}

impl EventScope {
    /// Year level and department restrictions, when present, must equal the student's.
    fn cohort_matches(&self, student: &StudentProfile) -> bool {
        let year_ok = match &self.year_level {
            Some(required) => student.year_level.as_ref() == Some(required),
            None => true,
        };
        let department_ok = match &self.department {
            Some(required) => student.department.as_ref() == Some(required),
            None => true,
        };
        year_ok && department_ok
    }
}

/// Decides whether `student` may check in to an event with `scope`.
pub fn can_access_event(scope: &EventScope, student: &StudentProfile) -> Result<(), AccessDenial> {
    if student.role != Role::Student {
        return Ok(());
    }

    let Some(course) = student.course.as_deref() else {
        return Err(AccessDenial::CourseNotSet);
    };

    let has_tags = !scope.tagged_courses.is_empty();

    match scope.course.as_deref() {
        None if !has_tags => return Ok(()),
        None => {}
        Some(primary) if primary == course => {
            if !scope.cohort_matches(student) {
                return Err(AccessDenial::NotAuthorizedToScan);
            }
            if !has_tags {
                return Ok(());
            }
        }
        Some(_) if !has_tags => return Err(AccessDenial::NotAuthorizedToScan),
        Some(_) => {}
    }

    // Tagged courses present: membership plus cohort.
    if scope.tagged_courses.iter().any(|tag| tag == course) && scope.cohort_matches(student) {
        Ok(())
    } else {
        Err(AccessDenial::NotAuthorizedToScan)
    }
}
