//! QR payload encoding and per-event rotation of student QR identities.
//!
//! A student's `qr_code_data` encodes exactly one identity context at a time:
//! either `student:<id>` or `event:<event_id>:student:<id>` for the single tagged
//! event currently holding the student's slot. Activation parks the previous
//! payload in the `original_*` columns; reversion restores it.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use chrono::{DateTime, Utc};
use db::models::{
    event,
    user::{self, Column as UserColumn, Entity as UserEntity, Role, STUDENT_QR_TYPE},
};
use qrcode::{EcLevel, QrCode, render::svg};
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, sea_query::Expr,
};
use util::state::AppState;

use crate::error::ServiceError;

const DATA_URL_PREFIX: &str = "data:image/svg+xml;base64,";

/// Renders `content` as an SVG QR code wrapped in a data URL.
pub fn encode(content: &str) -> Result<String, ServiceError> {
    let code = QrCode::with_error_correction_level(content.as_bytes(), EcLevel::M)
        .map_err(|e| ServiceError::Internal(format!("qr encoding failed: {e}")))?;
    let image = code
        .render::<svg::Color>()
        .min_dimensions(256, 256)
        .quiet_zone(true)
        .build();
    Ok(format!("{DATA_URL_PREFIX}{}", STANDARD.encode(image)))
}

pub fn student_content(student_id: &str) -> String {
    format!("student:{student_id}")
}

pub fn event_student_content(event_id: i64, student_id: &str) -> String {
    format!("event:{event_id}:student:{student_id}")
}

pub fn event_qr_type(event_id: i64) -> String {
    format!("event:{event_id}")
}

/// Content of an event's own QR code.
pub fn event_content(issued_at: DateTime<Utc>, created_by: &str) -> String {
    format!("event:{}:{}", issued_at.timestamp(), created_by)
}

/// Which students an event rotates.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RotationScope {
    pub courses: Vec<String>,
    pub year_level: Option<String>,
    pub section: Option<String>,
}

impl RotationScope {
    /// `None` when the event does not rotate anyone.
    pub fn for_event(event: &event::Model) -> Option<Self> {
        let courses = event.rotation_courses();
        if courses.is_empty() {
            return None;
        }
        Some(Self {
            courses,
            year_level: non_blank(&event.year_level),
            section: non_blank(&event.section),
        })
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RotationReport {
    pub updated: usize,
    pub skipped: usize,
}

/// Swaps in event-scoped payloads for every eligible student without an active event.
///
/// Does nothing unless the event is still active and not completed or cancelled
/// when the job runs. Per-student failures are logged and counted as skipped.
pub async fn activate_for_event(
    db: &DatabaseConnection,
    event_id: i64,
    scope: &RotationScope,
    now: DateTime<Utc>,
) -> Result<RotationReport, DbErr> {
    let live = event::Entity::find_by_id(event_id)
        .one(db)
        .await?
        .is_some_and(|e| e.is_active && !e.status.is_terminal());
    if !live {
        tracing::debug!(event_id, "Event no longer live, skipping QR activation");
        return Ok(RotationReport::default());
    }

    let courses: Vec<String> = scope.courses.iter().map(|c| c.trim().to_uppercase()).collect();

    let mut query = UserEntity::find()
        .filter(UserColumn::Role.eq(Role::Student))
        .filter(UserColumn::Course.is_in(courses))
        .filter(UserColumn::ActiveEventId.is_null());
    if let Some(year_level) = &scope.year_level {
        query = query.filter(UserColumn::YearLevel.eq(year_level.as_str()));
    }
    if let Some(section) = &scope.section {
        query = query.filter(UserColumn::Section.eq(section.as_str()));
    }

    let students = query.all(db).await?;
    let mut report = RotationReport::default();

    for student in students {
        match claim_for_event(db, &student, event_id, now).await {
            Ok(true) => report.updated += 1,
            Ok(false) => {
                report.skipped += 1;
                tracing::debug!(event_id, student_id = %student.student_id, "QR slot already claimed");
            }
            Err(e) => {
                report.skipped += 1;
                tracing::warn!(event_id, student_id = %student.student_id, error = %e, "Failed to rotate student QR");
            }
        }
    }

    tracing::info!(event_id, updated = report.updated, skipped = report.skipped, "Activated event QR codes");
    Ok(report)
}

/// Conditional on the slot still being free, so the first event to claim a student wins.
async fn claim_for_event(
    db: &DatabaseConnection,
    student: &user::Model,
    event_id: i64,
    now: DateTime<Utc>,
) -> Result<bool, ServiceError> {
    let payload = encode(&event_student_content(event_id, &student.student_id))?;

    let result = UserEntity::update_many()
        .col_expr(
            UserColumn::OriginalQrCodeData,
            Expr::value(student.qr_code_data.clone()),
        )
        .col_expr(
            UserColumn::OriginalQrType,
            Expr::value(Some(student.qr_type.clone())),
        )
        .col_expr(UserColumn::QrCodeData, Expr::value(Some(payload)))
        .col_expr(UserColumn::QrType, Expr::value(event_qr_type(event_id)))
        .col_expr(UserColumn::ActiveEventId, Expr::value(Some(event_id)))
        .col_expr(UserColumn::QrGeneratedAt, Expr::value(Some(now)))
        .col_expr(UserColumn::UpdatedAt, Expr::value(now))
        .filter(UserColumn::Id.eq(student.id))
        .filter(UserColumn::ActiveEventId.is_null())
        .exec(db)
        .await?;

    Ok(result.rows_affected == 1)
}

/// Restores every student whose slot `event_id` holds. Calling it again is a no-op.
pub async fn revert_for_event(
    db: &DatabaseConnection,
    event_id: i64,
    now: DateTime<Utc>,
) -> Result<RotationReport, DbErr> {
    let students = UserEntity::find()
        .filter(UserColumn::ActiveEventId.eq(event_id))
        .all(db)
        .await?;

    let mut report = RotationReport::default();
    for student in students {
        match release_from_event(db, &student, event_id, now).await {
            Ok(true) => report.updated += 1,
            Ok(false) => report.skipped += 1,
            Err(e) => {
                report.skipped += 1;
                tracing::warn!(event_id, student_id = %student.student_id, error = %e, "Failed to revert student QR");
            }
        }
    }

    if report.updated > 0 {
        tracing::info!(event_id, reverted = report.updated, "Reverted event QR codes");
    }
    Ok(report)
}

async fn release_from_event(
    db: &DatabaseConnection,
    student: &user::Model,
    event_id: i64,
    now: DateTime<Utc>,
) -> Result<bool, ServiceError> {
    let (payload, qr_type) = match &student.original_qr_code_data {
        Some(original) => (
            original.clone(),
            student
                .original_qr_type
                .clone()
                .unwrap_or_else(|| STUDENT_QR_TYPE.to_string()),
        ),
        None => (
            encode(&student_content(&student.student_id))?,
            STUDENT_QR_TYPE.to_string(),
        ),
    };

    let result = UserEntity::update_many()
        .col_expr(UserColumn::QrCodeData, Expr::value(Some(payload)))
        .col_expr(UserColumn::QrType, Expr::value(qr_type))
        .col_expr(UserColumn::ActiveEventId, Expr::value(Option::<i64>::None))
        .col_expr(UserColumn::OriginalQrCodeData, Expr::value(Option::<String>::None))
        .col_expr(UserColumn::OriginalQrType, Expr::value(Option::<String>::None))
        .col_expr(UserColumn::QrGeneratedAt, Expr::value(Some(now)))
        .col_expr(UserColumn::UpdatedAt, Expr::value(now))
        .filter(UserColumn::Id.eq(student.id))
        .filter(UserColumn::ActiveEventId.eq(event_id))
        .exec(db)
        .await?;

    Ok(result.rows_affected == 1)
}

/// Queues activation for a freshly created event.
pub fn schedule_activation(state: &AppState, event: &event::Model) {
    let Some(scope) = RotationScope::for_event(event) else {
        return;
    };
    let db = state.db_clone();
    let event_id = event.id;
    state.tasks().submit("qr_activate", async move {
        if let Err(e) = activate_for_event(&db, event_id, &scope, Utc::now()).await {
            tracing::error!(event_id, error = %e, "QR activation failed");
        }
    });
}

/// Queues revert followed by re-activation, in that order, as one job.
///
/// Re-activation only happens while the event is still live.
pub fn schedule_refresh(state: &AppState, event: &event::Model) {
    let scope = if event.is_active && !event.status.is_terminal() {
        RotationScope::for_event(event)
    } else {
        None
    };
    let db = state.db_clone();
    let event_id = event.id;
    state.tasks().submit("qr_refresh", async move {
        if let Err(e) = revert_for_event(&db, event_id, Utc::now()).await {
            tracing::error!(event_id, error = %e, "QR revert failed");
            return;
        }
        if let Some(scope) = scope {
            if let Err(e) = activate_for_event(&db, event_id, &scope, Utc::now()).await {
                tracing::error!(event_id, error = %e, "QR re-activation failed");
            }
        }
    });
}

pub fn schedule_revert(state: &AppState, event_id: i64) {
    let db = state.db_clone();
    state.tasks().submit("qr_revert", async move {
        if let Err(e) = revert_for_event(&db, event_id, Utc::now()).await {
            tracing::error!(event_id, error = %e, "QR revert failed");
        }
    });
}
