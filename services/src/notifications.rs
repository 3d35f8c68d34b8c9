//! Composition and background submission of outbound notifications.

use chrono::{DateTime, Utc};
use db::models::{
    attendance::TimingStatus,
    event,
    user::{self, Model as UserModel},
};
use sea_orm::{DatabaseConnection, DbErr};
use util::state::AppState;

use crate::attendance::AttendanceAction;

#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub subject: String,
    pub body: String,
}

pub fn timing_text(action: AttendanceAction, status: TimingStatus) -> &'static str {
    match (action, status) {
        (AttendanceAction::CheckIn, TimingStatus::Early) => "Early (arrived before scheduled time)",
        (AttendanceAction::CheckIn, TimingStatus::OnTime) => "On Time",
        (AttendanceAction::CheckIn, TimingStatus::Late) => "Late",
        (AttendanceAction::CheckOut, TimingStatus::Early) => "Left Early",
        (AttendanceAction::CheckOut, TimingStatus::OnTime) => "On Time",
        (AttendanceAction::CheckOut, TimingStatus::Late) => "Left Late",
    }
}

pub fn attendance_notice(
    action: AttendanceAction,
    event: &event::Model,
    student: &UserModel,
    at: DateTime<Utc>,
    status: TimingStatus,
) -> Notice {
    let (prefix, time_label) = match action {
        AttendanceAction::CheckIn => ("Check-In", "Check-In Time"),
        AttendanceAction::CheckOut => ("Check-Out", "Check-Out Time"),
    };

    let subject = format!("{prefix}: {} - {}", student.full_name(), event.title);
    let body = format!(
        "Event: {}\nStudent: {} ({})\nStudent ID: {}\n{}: {}\nStatus: {}\nLocation: {}\n",
        event.title,
        student.full_name(),
        student.username,
        student.student_id,
        time_label,
        at.format("%B %-d, %Y %-I:%M %p UTC"),
        timing_text(action, status),
        event.location.as_deref().unwrap_or("-"),
    );

    Notice { subject, body }
}

/// Emails of every admin and superadmin plus the event creator, without duplicates.
pub async fn attendance_recipients(
    db: &DatabaseConnection,
    creator_student_id: &str,
) -> Result<Vec<String>, DbErr> {
    let mut people = user::Model::find_admins(db).await?;
    if !people.iter().any(|u| u.student_id == creator_student_id) {
        if let Some(creator) = user::Model::find_by_student_id(db, creator_student_id).await? {
            people.push(creator);
        }
    }

    let mut emails: Vec<String> = Vec::with_capacity(people.len());
    for person in people {
        if !person.email.is_empty() && !emails.contains(&person.email) {
            emails.push(person.email);
        }
    }
    Ok(emails)
}

/// Queues a check-in/check-out notice. Never fails the caller.
pub fn submit_attendance_notice(
    state: &AppState,
    action: AttendanceAction,
    event: &event::Model,
    student: &UserModel,
    at: DateTime<Utc>,
    status: TimingStatus,
) {
    let notice = attendance_notice(action, event, student, at, status);
    let creator = event.created_by.clone();
    let event_id = event.id;
    let db = state.db_clone();
    let notifier = state.notifier_clone();

    state.tasks().submit("attendance_notice", async move {
        let recipients = match attendance_recipients(&db, &creator).await {
            Ok(list) if list.is_empty() => return,
            Ok(list) => list,
            Err(e) => {
                tracing::warn!(event_id, error = %e, "Could not resolve notification recipients");
                return;
            }
        };
        if let Err(e) = notifier.send(&recipients, &notice.subject, &notice.body).await {
            tracing::warn!(event_id, error = %e, "Attendance notification failed");
        }
    });
}

/// Queues the verification code mail for a new registration.
pub fn submit_verification_code(state: &AppState, email: &str, first_name: &str, code: &str, minutes: i64) {
    let recipients = vec![email.to_string()];
    let subject = "Verify your account".to_string();
    let body = format!(
        "Hello {first_name},\n\nYour verification code is {code}. It expires in {minutes} minutes.\n"
    );
    let notifier = state.notifier_clone();

    state.tasks().submit("verification_code", async move {
        if let Err(e) = notifier.send(&recipients, &subject, &body).await {
            tracing::warn!(error = %e, "Verification email failed");
        }
    });
}
