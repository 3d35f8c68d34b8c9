//! Event creation, editing, soft deletion and the views built over events.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use db::models::{
    attendance,
    event::{self, Column as EventColumn, Entity as EventEntity, EventStatus, join_courses},
};
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, DatabaseConnection, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder, Set,
};
use serde::{Deserialize, Serialize};
use util::state::AppState;
use validator::Validate;

use crate::{Actor, error::ServiceError, qr};

/// Descriptions stay hidden until this long before the start.
pub const DESCRIPTION_REVEAL_HOURS: i64 = 24;

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CreateEventRequest {
    #[validate(length(min = 1, max = 255, message = "title is required"))]
    pub title: String,
    pub description: Option<String>,
    /// `YYYY-MM-DD`.
    pub event_date: String,
    pub start_time: String,
    pub end_time: String,
    pub location: Option<String>,
    pub course: Option<String>,
    pub section: Option<String>,
    pub year_level: Option<String>,
    pub department: Option<String>,
    pub college: Option<String>,
    #[serde(default)]
    pub tagged_courses: Vec<String>,
}

/// Partial update. Absent fields are left alone; blank strings clear optional columns.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct UpdateEventRequest {
    #[validate(length(min = 1, max = 255, message = "title cannot be empty"))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub event_date: Option<String>,
    pub start_time: Option<String>,
    pub end_time: Option<String>,
    pub location: Option<String>,
    pub course: Option<String>,
    pub section: Option<String>,
    pub year_level: Option<String>,
    pub department: Option<String>,
    pub college: Option<String>,
    pub tagged_courses: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct EventFilter {
    pub course: Option<String>,
    pub section: Option<String>,
    pub year_level: Option<String>,
    pub status: Option<EventStatus>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
pub struct EventView {
    #[serde(flatten)]
    pub event: event::Model,
    pub attendee_count: u64,
}

/// An event as a particular student sees it.
#[derive(Debug, Clone, Serialize)]
pub struct StudentEventView {
    #[serde(flatten)]
    pub event: event::Model,
    pub tagged_course_list: Vec<String>,
    /// Whether the student's course is on the event's allow-list.
    pub allowed: bool,
    pub attendee_count: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct EventQr {
    pub event_id: i64,
    pub qr_code_data: String,
}

pub fn parse_event_date(raw: &str) -> Result<NaiveDate, ServiceError> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| ServiceError::validation("invalid event_date format. Use YYYY-MM-DD"))
}

/// Accepts RFC 3339, `YYYY-MM-DDTHH:MM:SS` or `HH:MM` on `date`. Naive values are UTC.
pub fn parse_event_time(raw: &str, date: NaiveDate, field: &str) -> Result<DateTime<Utc>, ServiceError> {
    let raw = raw.trim();

    if let Ok(t) = DateTime::parse_from_rfc3339(raw) {
        return Ok(t.with_timezone(&Utc));
    }
    if let Ok(t) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S") {
        return Ok(t.and_utc());
    }
    if let Ok(t) = NaiveTime::parse_from_str(raw, "%H:%M") {
        return Ok(date.and_time(t).and_utc());
    }

    Err(ServiceError::Validation(format!(
        "invalid {field} format. Use HH:MM, YYYY-MM-DDTHH:MM:SS, or ISO 8601"
    )))
}

fn ensure_ordered(start: DateTime<Utc>, end: DateTime<Utc>) -> Result<(), ServiceError> {
    if end <= start {
        return Err(ServiceError::validation("end_time must be after start_time"));
    }
    Ok(())
}

fn cleaned(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn cleaned_course(value: Option<String>) -> Option<String> {
    cleaned(value).map(|v| v.to_uppercase())
}

fn hide_description(mut event: event::Model, now: DateTime<Utc>) -> event::Model {
    if now < event.start_time - Duration::hours(DESCRIPTION_REVEAL_HOURS) {
        event.description = None;
    }
    event
}

async fn load(db: &DatabaseConnection, event_id: i64) -> Result<event::Model, ServiceError> {
    EventEntity::find_by_id(event_id)
        .one(db)
        .await?
        .ok_or_else(|| ServiceError::not_found("event not found"))
}

async fn with_count(db: &DatabaseConnection, event: event::Model, now: DateTime<Utc>) -> Result<EventView, ServiceError> {
    let attendee_count = attendance::Model::count_for_event(db, event.id).await?;
    Ok(EventView {
        event: hide_description(event, now),
        attendee_count,
    })
}

/// Creates a scheduled, active event and queues QR activation for its students.
pub async fn create_event(
    state: &AppState,
    req: CreateEventRequest,
    actor: &Actor,
    now: DateTime<Utc>,
) -> Result<event::Model, ServiceError> {
    if !actor.role.is_staff() {
        return Err(ServiceError::access_denied(
            "only faculty, admin, or superadmin can create events",
        ));
    }
    req.validate()?;

    let event_date = parse_event_date(&req.event_date)?;
    let start_time = parse_event_time(&req.start_time, event_date, "start_time")?;
    let end_time = parse_event_time(&req.end_time, event_date, "end_time")?;
    ensure_ordered(start_time, end_time)?;

    let qr_code_data = qr::encode(&qr::event_content(now, &actor.student_id))?;

    let created = event::ActiveModel {
        id: NotSet,
        title: Set(req.title.trim().to_string()),
        description: Set(cleaned(req.description)),
        event_date: Set(event_date),
        start_time: Set(start_time),
        end_time: Set(end_time),
        location: Set(cleaned(req.location)),
        course: Set(cleaned_course(req.course)),
        section: Set(cleaned(req.section)),
        year_level: Set(cleaned(req.year_level)),
        department: Set(cleaned(req.department)),
        college: Set(cleaned(req.college)),
        tagged_courses: Set(join_courses(&req.tagged_courses)),
        created_by: Set(actor.student_id.clone()),
        created_by_role: Set(actor.role),
        status: Set(EventStatus::Scheduled),
        is_active: Set(true),
        qr_code_data: Set(Some(qr_code_data)),
        created_at: Set(now),
        updated_at: Set(now),
    }
    .insert(state.db())
    .await?;

    tracing::info!(
        event_id = created.id,
        created_by = %actor.student_id,
        start = %created.start_time,
        end = %created.end_time,
        "Event created"
    );

    qr::schedule_activation(state, &created);
    Ok(created)
}

/// Applies a partial update and queues a revert-then-reactivate of student QR codes.
pub async fn update_event(
    state: &AppState,
    event_id: i64,
    req: UpdateEventRequest,
    actor: &Actor,
    now: DateTime<Utc>,
) -> Result<event::Model, ServiceError> {
    req.validate()?;
    let db = state.db();
    let existing = load(db, event_id).await?;

    if existing.created_by != actor.student_id && !actor.role.is_staff() {
        return Err(ServiceError::access_denied(
            "only the event creator, faculty, or admin can update this event",
        ));
    }

    let event_date = match req.event_date.as_deref() {
        Some(raw) => parse_event_date(raw)?,
        None => existing.event_date,
    };
    let start_time = match req.start_time.as_deref() {
        Some(raw) => parse_event_time(raw, event_date, "start_time")?,
        None => existing.start_time,
    };
    let end_time = match req.end_time.as_deref() {
        Some(raw) => parse_event_time(raw, event_date, "end_time")?,
        None => existing.end_time,
    };
    ensure_ordered(start_time, end_time)?;

    let mut active = existing.into_active_model();
    active.event_date = Set(event_date);
    active.start_time = Set(start_time);
    active.end_time = Set(end_time);

    if let Some(title) = req.title {
        active.title = Set(title.trim().to_string());
    }
    if req.description.is_some() {
        active.description = Set(cleaned(req.description));
    }
    if req.location.is_some() {
        active.location = Set(cleaned(req.location));
    }
    if req.course.is_some() {
        active.course = Set(cleaned_course(req.course));
    }
    if req.section.is_some() {
        active.section = Set(cleaned(req.section));
    }
    if req.year_level.is_some() {
        active.year_level = Set(cleaned(req.year_level));
    }
    if req.department.is_some() {
        active.department = Set(cleaned(req.department));
    }
    if req.college.is_some() {
        active.college = Set(cleaned(req.college));
    }
    if let Some(tags) = req.tagged_courses {
        active.tagged_courses = Set(join_courses(&tags));
    }
    active.updated_at = Set(now);

    let updated = active.update(db).await?;
    tracing::info!(event_id, updated_by = %actor.student_id, "Event updated");

    qr::schedule_refresh(state, &updated);
    Ok(updated)
}

/// Soft delete: the event becomes cancelled and inactive, and its students are reverted.
pub async fn delete_event(
    state: &AppState,
    event_id: i64,
    actor: &Actor,
    now: DateTime<Utc>,
) -> Result<(), ServiceError> {
    let db = state.db();
    let existing = load(db, event_id).await?;

    if existing.created_by != actor.student_id && !actor.role.is_admin() {
        return Err(ServiceError::access_denied(
            "only the event creator or an admin can delete this event",
        ));
    }

    let mut active = existing.into_active_model();
    active.status = Set(EventStatus::Cancelled);
    active.is_active = Set(false);
    active.updated_at = Set(now);
    active.update(db).await?;

    tracing::info!(event_id, deleted_by = %actor.student_id, "Event cancelled");
    qr::schedule_revert(state, event_id);
    Ok(())
}

pub async fn get_event(db: &DatabaseConnection, event_id: i64, now: DateTime<Utc>) -> Result<EventView, ServiceError> {
    let event = load(db, event_id).await?;
    with_count(db, event, now).await
}

/// Events matching `filter`, latest date and start first.
pub async fn list_events(
    db: &DatabaseConnection,
    filter: &EventFilter,
    now: DateTime<Utc>,
) -> Result<Vec<EventView>, ServiceError> {
    let mut query = EventEntity::find();

    if let Some(course) = cleaned(filter.course.clone()) {
        query = query.filter(EventColumn::Course.eq(course.to_uppercase()));
    }
    if let Some(section) = cleaned(filter.section.clone()) {
        query = query.filter(EventColumn::Section.eq(section));
    }
    if let Some(year_level) = cleaned(filter.year_level.clone()) {
        query = query.filter(EventColumn::YearLevel.eq(year_level));
    }
    if let Some(status) = filter.status {
        query = query.filter(EventColumn::Status.eq(status));
    }
    if let Some(is_active) = filter.is_active {
        query = query.filter(EventColumn::IsActive.eq(is_active));
    }

    let events = query
        .order_by_desc(EventColumn::EventDate)
        .order_by_desc(EventColumn::StartTime)
        .all(db)
        .await?;

    let mut views = Vec::with_capacity(events.len());
    for event in events {
        views.push(with_count(db, event, now).await?);
    }
    Ok(views)
}

/// `true` when the event has no allow-list or the course is on it.
pub fn course_allowed(tags: &[String], course: Option<&str>) -> bool {
    if tags.is_empty() {
        return true;
    }
    match course.map(|c| c.trim().to_uppercase()) {
        Some(course) if !course.is_empty() => tags.iter().any(|t| *t == course),
        _ => false,
    }
}

/// Active events annotated with whether `student_id`'s course is allowed, latest first.
pub async fn events_for_student(
    db: &DatabaseConnection,
    student_id: &str,
    now: DateTime<Utc>,
) -> Result<Vec<StudentEventView>, ServiceError> {
    let student = db::models::user::Model::find_by_student_id(db, student_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("student not found"))?;

    let events = EventEntity::find()
        .filter(EventColumn::IsActive.eq(true))
        .order_by_desc(EventColumn::EventDate)
        .order_by_desc(EventColumn::StartTime)
        .all(db)
        .await?;

    let mut views = Vec::with_capacity(events.len());
    for event in events {
        let tagged_course_list = event.tagged_course_list();
        let allowed = course_allowed(&tagged_course_list, student.course.as_deref());
        let attendee_count = attendance::Model::count_for_event(db, event.id).await?;
        views.push(StudentEventView {
            event: hide_description(event, now),
            tagged_course_list,
            allowed,
            attendee_count,
        });
    }
    Ok(views)
}

/// The event-level QR, generated and stored on first request.
pub async fn event_qr_code(db: &DatabaseConnection, event_id: i64, now: DateTime<Utc>) -> Result<EventQr, ServiceError> {
    let event = load(db, event_id).await?;

    if let Some(existing) = event.qr_code_data.clone().filter(|q| !q.is_empty()) {
        return Ok(EventQr {
            event_id,
            qr_code_data: existing,
        });
    }

    let qr_code_data = qr::encode(&qr::event_content(now, &event.created_by))?;
    let mut active = event.into_active_model();
    active.qr_code_data = Set(Some(qr_code_data.clone()));
    active.updated_at = Set(now);
    active.update(db).await?;

    Ok(EventQr {
        event_id,
        qr_code_data,
    })
}
