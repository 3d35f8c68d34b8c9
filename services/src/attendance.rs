//! Check-in/check-out state machine for one (event, student) pair.
//!
//! NoRecord -> CheckedIn -> CheckedOut. Repeated actions are rejected. The unique
//! index on `(event_id, student_id)` serializes concurrent first check-ins; the
//! losing insert reloads the winner's row and re-applies its action once.

use chrono::{DateTime, NaiveDate, Utc};
use db::models::{
    attendance::{
        self, ActiveModel as AttendanceActiveModel, AttendanceStatus, Column as AttendanceColumn,
        DEFAULT_METHOD, Entity as AttendanceEntity, TimingStatus,
    },
    event::{self, Entity as EventEntity, EventStatus},
    user::{self, Role},
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, SqlErr,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use util::state::AppState;

use crate::{
    Actor,
    access::{EventScope, StudentProfile, can_access_event},
    error::ServiceError,
    notifications, timing,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttendanceAction {
    CheckIn,
    CheckOut,
}

impl AttendanceAction {
    pub fn parse(raw: &str) -> Result<Self, ServiceError> {
        match raw.trim() {
            "check_in" => Ok(Self::CheckIn),
            "check_out" => Ok(Self::CheckOut),
            _ => Err(ServiceError::validation(
                "invalid action. must be 'check_in' or 'check_out'",
            )),
        }
    }
}

impl fmt::Display for AttendanceAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::CheckIn => "check_in",
            Self::CheckOut => "check_out",
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MarkAttendanceRequest {
    pub event_id: i64,
    /// Defaults to the acting user.
    pub student_id: Option<String>,
    pub action: String,
    pub method: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MarkedAttendance {
    pub action: AttendanceAction,
    pub attendance: attendance::Model,
    pub total_attendance_count: u64,
    pub event_attendance_count: u64,
}

/// Applies `action` to `record` in memory.
pub fn apply_action(
    record: &mut attendance::Model,
    action: AttendanceAction,
    event: &event::Model,
    actor_role: Role,
    now: DateTime<Utc>,
) -> Result<TimingStatus, ServiceError> {
    match action {
        AttendanceAction::CheckIn => {
            if record.check_in_time.is_some() {
                return Err(ServiceError::conflict("already checked in"));
            }
            timing::ensure_check_in_window(actor_role, now, event.start_time, event.end_time)?;

            let status = timing::classify(now, event.start_time, timing::check_in_grace());
            record.check_in_time = Some(now);
            record.check_in_status = Some(status);
            record.status = match status {
                TimingStatus::Late => AttendanceStatus::Late,
                TimingStatus::Early | TimingStatus::OnTime => AttendanceStatus::Present,
            };
            Ok(status)
        }
        AttendanceAction::CheckOut => {
            let Some(checked_in) = record.check_in_time else {
                return Err(ServiceError::state("must check in first before checking out"));
            };
            if record.check_out_time.is_some() {
                return Err(ServiceError::conflict("already checked out"));
            }
            if now < checked_in {
                return Err(ServiceError::state("check-out cannot precede check-in"));
            }

            let status = timing::classify(now, event.end_time, timing::check_out_grace());
            record.check_out_time = Some(now);
            record.check_out_status = Some(status);
            Ok(status)
        }
    }
}

fn fresh_record(
    event_id: i64,
    student_id: &str,
    actor: &Actor,
    req: &MarkAttendanceRequest,
    now: DateTime<Utc>,
) -> attendance::Model {
    let method = req
        .method
        .as_deref()
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .unwrap_or(DEFAULT_METHOD);

    attendance::Model {
        id: 0,
        event_id,
        student_id: student_id.to_string(),
        status: AttendanceStatus::Present,
        marked_at: now,
        marked_by: actor.student_id.clone(),
        marked_by_role: actor.role,
        method: method.to_string(),
        latitude: req.latitude,
        longitude: req.longitude,
        notes: req.notes.clone(),
        check_in_time: None,
        check_out_time: None,
        check_in_status: None,
        check_out_status: None,
        created_at: now,
        updated_at: now,
    }
}

fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

async fn insert_record(db: &DatabaseConnection, record: attendance::Model) -> Result<attendance::Model, DbErr> {
    let mut active: AttendanceActiveModel = record.into();
    active.id = NotSet;
    active.insert(db).await
}

async fn update_record(
    db: &DatabaseConnection,
    before: attendance::Model,
    after: &attendance::Model,
    now: DateTime<Utc>,
) -> Result<attendance::Model, DbErr> {
    let mut active: AttendanceActiveModel = before.into();
    active.status = Set(after.status);
    active.check_in_time = Set(after.check_in_time);
    active.check_in_status = Set(after.check_in_status);
    active.check_out_time = Set(after.check_out_time);
    active.check_out_status = Set(after.check_out_status);
    active.updated_at = Set(now);
    active.update(db).await
}

/// Records a check-in or check-out and queues the matching notification.
pub async fn mark_attendance(
    state: &AppState,
    req: MarkAttendanceRequest,
    actor: &Actor,
    now: DateTime<Utc>,
) -> Result<MarkedAttendance, ServiceError> {
    let db = state.db();
    let action = AttendanceAction::parse(&req.action)?;

    let event = EventEntity::find_by_id(req.event_id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("event not found"))?;
    if !event.is_active || event.status == EventStatus::Cancelled {
        return Err(ServiceError::state("event is not active"));
    }

    let target_id = req
        .student_id
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(&actor.student_id)
        .to_string();
    if target_id != actor.student_id && !actor.role.is_staff() {
        return Err(ServiceError::access_denied(
            "students can only mark their own attendance",
        ));
    }

    let student = user::Model::find_by_student_id(db, &target_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("student not found"))?;

    can_access_event(&EventScope::from(&event), &StudentProfile::from(&student))?;

    let mut attempt = 0;
    let (saved, timing_status) = loop {
        attempt += 1;
        let existing = attendance::Model::find_for_pair(db, event.id, &target_id).await?;

        match existing {
            Some(before) => {
                let mut after = before.clone();
                let status = apply_action(&mut after, action, &event, actor.role, now)?;
                break (update_record(db, before, &after, now).await?, status);
            }
            None => {
                let mut record = fresh_record(event.id, &target_id, actor, &req, now);
                let status = apply_action(&mut record, action, &event, actor.role, now)?;
                match insert_record(db, record).await {
                    Ok(saved) => break (saved, status),
                    Err(e) if attempt < 2 && is_unique_violation(&e) => {
                        tracing::debug!(event_id = event.id, student_id = %target_id, "Concurrent first write; reloading");
                        continue;
                    }
                    Err(e) => return Err(e.into()),
                }
            }
        }
    };

    tracing::info!(
        event_id = event.id,
        student_id = %target_id,
        marked_by = %actor.student_id,
        %action,
        timing = %timing_status,
        "Attendance marked"
    );

    notifications::submit_attendance_notice(state, action, &event, &student, now, timing_status);

    Ok(MarkedAttendance {
        action,
        total_attendance_count: attendance::Model::count_for_student(db, &target_id).await?,
        event_attendance_count: attendance::Model::count_for_event(db, event.id).await?,
        attendance: saved,
    })
}

/// Records for an event, newest first.
pub async fn list_for_event(
    db: &DatabaseConnection,
    event_id: i64,
) -> Result<Vec<attendance::Model>, ServiceError> {
    if EventEntity::find_by_id(event_id).one(db).await?.is_none() {
        return Err(ServiceError::not_found("event not found"));
    }

    Ok(AttendanceEntity::find()
        .filter(AttendanceColumn::EventId.eq(event_id))
        .order_by_desc(AttendanceColumn::MarkedAt)
        .all(db)
        .await?)
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StudentAttendanceFilter {
    pub event_id: Option<i64>,
    pub status: Option<AttendanceStatus>,
    /// Inclusive, by `marked_at` date.
    pub start_date: Option<NaiveDate>,
    /// Inclusive, by `marked_at` date.
    pub end_date: Option<NaiveDate>,
}

pub async fn list_for_student(
    db: &DatabaseConnection,
    student_id: &str,
    filter: &StudentAttendanceFilter,
) -> Result<Vec<attendance::Model>, ServiceError> {
    let mut query = AttendanceEntity::find().filter(AttendanceColumn::StudentId.eq(student_id));

    if let Some(event_id) = filter.event_id {
        query = query.filter(AttendanceColumn::EventId.eq(event_id));
    }
    if let Some(status) = filter.status {
        query = query.filter(AttendanceColumn::Status.eq(status));
    }
    if let Some(start) = filter.start_date {
        let from = start.and_hms_opt(0, 0, 0).map(|t| t.and_utc());
        query = query.filter(AttendanceColumn::MarkedAt.gte(from));
    }
    if let Some(end) = filter.end_date {
        let until = end.succ_opt().and_then(|d| d.and_hms_opt(0, 0, 0)).map(|t| t.and_utc());
        if let Some(until) = until {
            query = query.filter(AttendanceColumn::MarkedAt.lt(until));
        }
    }

    Ok(query.order_by_desc(AttendanceColumn::MarkedAt).all(db).await?)
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: AttendanceStatus,
    pub notes: Option<String>,
}

/// Staff override of a record's aggregate status.
pub async fn update_status(
    db: &DatabaseConnection,
    attendance_id: i64,
    req: UpdateStatusRequest,
    actor: &Actor,
    now: DateTime<Utc>,
) -> Result<attendance::Model, ServiceError> {
    if !actor.role.is_staff() {
        return Err(ServiceError::access_denied(
            "only faculty and administrators can update attendance status",
        ));
    }

    let record = AttendanceEntity::find_by_id(attendance_id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("attendance record not found"))?;

    let mut active: AttendanceActiveModel = record.into();
    active.status = Set(req.status);
    active.marked_by = Set(actor.student_id.clone());
    active.marked_by_role = Set(actor.role);
    if let Some(notes) = req.notes {
        active.notes = Set(Some(notes));
    }
    active.updated_at = Set(now);

    Ok(active.update(db).await?)
}
