//! Registration, verification, credential checks and role administration.

use chrono::{DateTime, Duration, Utc};
use db::models::{
    attendance::Entity as AttendanceEntity,
    event::{Column as EventColumn, Entity as EventEntity, EventStatus},
    user::{self, Column as UserColumn, Entity as UserEntity, NewUser, Role, STUDENT_QR_TYPE},
};
use rand::Rng;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, IntoActiveModel,
    PaginatorTrait, QueryFilter, QueryOrder, Set, SqlErr,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use util::state::AppState;
use validator::Validate;

use crate::{Actor, error::ServiceError, notifications, qr};

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct RegisterRequest {
    /// Generated as `YYMMDD-XXXX` when absent.
    pub student_id: Option<String>,
    #[validate(email(message = "Invalid email format"))]
    pub email: String,
    #[validate(length(min = 8, message = "password must be at least 8 characters"))]
    pub password: String,
    pub username: Option<String>,
    #[validate(length(min = 1, message = "first_name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "last_name is required"))]
    pub last_name: String,
    pub middle_name: Option<String>,
    pub course: Option<String>,
    pub year_level: Option<String>,
    pub section: Option<String>,
    pub department: Option<String>,
    pub college: Option<String>,
    pub contact_number: Option<String>,
    pub address: Option<String>,
}

/// `YYMMDD-XXXX` with a random four-digit suffix.
pub fn generate_student_id(now: DateTime<Utc>) -> String {
    let suffix: u32 = rand::rng().random_range(0..10_000);
    format!("{}-{suffix:04}", now.format("%y%m%d"))
}

fn generate_verification_code() -> String {
    format!("{:06}", rand::rng().random_range(0..1_000_000u32))
}

fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

async fn unused_student_id(db: &DatabaseConnection, now: DateTime<Utc>) -> Result<String, ServiceError> {
    for _ in 0..5 {
        let candidate = generate_student_id(now);
        if user::Model::find_by_student_id(db, &candidate).await?.is_none() {
            return Ok(candidate);
        }
    }
    Err(ServiceError::Internal("could not allocate a student id".into()))
}

/// Creates an unverified student and queues the verification code mail.
pub async fn register(
    state: &AppState,
    req: RegisterRequest,
    now: DateTime<Utc>,
) -> Result<user::Model, ServiceError> {
    req.validate()?;
    let db = state.db();

    if user::Model::find_by_email(db, &req.email).await?.is_some() {
        return Err(ServiceError::conflict("email already registered"));
    }

    let student_id = match req.student_id.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
        Some(provided) => {
            if user::Model::find_by_student_id(db, provided).await?.is_some() {
                return Err(ServiceError::conflict("student id already registered"));
            }
            provided.to_string()
        }
        None => unused_student_id(db, now).await?,
    };

    let username = req
        .username
        .clone()
        .filter(|u| !u.trim().is_empty())
        .unwrap_or_else(|| req.email.split('@').next().unwrap_or_default().to_string());

    let created = user::Model::create(
        db,
        &NewUser {
            student_id,
            email: req.email.clone(),
            username,
            password: req.password.clone(),
            role: Role::Student,
            first_name: req.first_name.clone(),
            last_name: req.last_name.clone(),
            middle_name: req.middle_name.clone(),
            course: req.course.clone(),
            year_level: req.year_level.clone(),
            section: req.section.clone(),
            department: req.department.clone(),
            college: req.college.clone(),
            contact_number: req.contact_number.clone(),
            address: req.address.clone(),
        },
    )
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            ServiceError::conflict("email or student id already registered")
        } else {
            e.into()
        }
    })?;

    let minutes = util::config::verification_code_minutes();
    let code = generate_verification_code();
    let mut active = created.into_active_model();
    active.verification_code = Set(Some(code.clone()));
    active.verification_expires_at = Set(Some(now + Duration::minutes(minutes)));
    let user = active.update(db).await?;

    tracing::info!(student_id = %user.student_id, "User registered; awaiting verification");
    notifications::submit_verification_code(state, &user.email, &user.first_name, &code, minutes);

    Ok(user)
}

/// Confirms a verification code and issues the student's initial QR identity.
pub async fn verify(
    db: &DatabaseConnection,
    email: &str,
    code: &str,
    now: DateTime<Utc>,
) -> Result<user::Model, ServiceError> {
    let user = user::Model::find_by_email(db, email)
        .await?
        .ok_or_else(|| ServiceError::not_found("user not found"))?;

    if user.is_verified {
        return Err(ServiceError::conflict("account already verified"));
    }
    if user.verification_code.as_deref() != Some(code.trim()) {
        return Err(ServiceError::validation("invalid verification code"));
    }
    if user.verification_expires_at.is_none_or(|expires| now > expires) {
        return Err(ServiceError::validation("verification code has expired"));
    }

    let payload = qr::encode(&qr::student_content(&user.student_id))?;
    let mut active = user.into_active_model();
    active.is_verified = Set(true);
    active.verified_at = Set(Some(now));
    active.verification_code = Set(None);
    active.verification_expires_at = Set(None);
    active.qr_code_data = Set(Some(payload));
    active.qr_type = Set(STUDENT_QR_TYPE.to_string());
    active.qr_generated_at = Set(Some(now));
    active.updated_at = Set(now);

    let verified = active.update(db).await?;
    tracing::info!(student_id = %verified.student_id, "User verified");
    Ok(verified)
}

/// Checks credentials. Unknown identifiers and wrong passwords look the same.
pub async fn authenticate(
    db: &DatabaseConnection,
    identifier: &str,
    password: &str,
) -> Result<user::Model, ServiceError> {
    let user = user::Model::find_by_identifier(db, identifier)
        .await?
        .filter(|u| u.verify_password(password))
        .ok_or_else(|| ServiceError::Unauthorized("invalid credentials".into()))?;

    if !user.is_verified {
        return Err(ServiceError::Forbidden(
            "account is not verified. Check your email for the verification code".into(),
        ));
    }
    Ok(user)
}

pub async fn get_user(db: &DatabaseConnection, student_id: &str) -> Result<user::Model, ServiceError> {
    user::Model::find_by_student_id(db, student_id)
        .await?
        .ok_or_else(|| ServiceError::not_found("user not found"))
}

/// The caller's current QR identity.
#[derive(Debug, Clone, Serialize)]
pub struct QrIdentity {
    pub student_id: String,
    pub qr_code_data: Option<String>,
    pub qr_type: String,
    pub active_event_id: Option<i64>,
    pub qr_generated_at: Option<DateTime<Utc>>,
}

pub async fn qr_identity(db: &DatabaseConnection, student_id: &str) -> Result<QrIdentity, ServiceError> {
    let user = get_user(db, student_id).await?;
    Ok(QrIdentity {
        student_id: user.student_id,
        qr_code_data: user.qr_code_data,
        qr_type: user.qr_type,
        active_event_id: user.active_event_id,
        qr_generated_at: user.qr_generated_at,
    })
}

/// Changes a user's role. Superadmin only; nobody can be promoted to superadmin.
pub async fn promote(
    db: &DatabaseConnection,
    actor: &Actor,
    target_student_id: &str,
    role: Role,
    now: DateTime<Utc>,
) -> Result<user::Model, ServiceError> {
    if actor.role != Role::Superadmin {
        return Err(ServiceError::access_denied("only a superadmin can change roles"));
    }
    if role == Role::Superadmin {
        return Err(ServiceError::validation(
            "role must be one of: student, faculty, admin",
        ));
    }

    let target = get_user(db, target_student_id).await?;
    if target.role == Role::Superadmin {
        return Err(ServiceError::access_denied("cannot change a superadmin's role"));
    }

    let previous = target.role;
    let mut active = target.into_active_model();
    active.role = Set(role);
    active.updated_at = Set(now);
    let updated = active.update(db).await?;

    tracing::info!(
        student_id = %updated.student_id,
        from = %previous,
        to = %role,
        by = %actor.student_id,
        "Role changed"
    );
    Ok(updated)
}

pub async fn list_users(db: &DatabaseConnection, role: Option<Role>) -> Result<Vec<user::Model>, ServiceError> {
    let mut query = UserEntity::find();
    if let Some(role) = role {
        query = query.filter(UserColumn::Role.eq(role));
    }
    Ok(query.order_by_desc(UserColumn::CreatedAt).all(db).await?)
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct SystemStats {
    pub total_users: u64,
    pub role_counts: BTreeMap<String, u64>,
    pub total_events: u64,
    pub event_status_counts: BTreeMap<String, u64>,
    pub total_attendance_records: u64,
}

pub async fn system_stats(db: &DatabaseConnection) -> Result<SystemStats, ServiceError> {
    let mut stats = SystemStats {
        total_users: UserEntity::find().count(db).await?,
        total_events: EventEntity::find().count(db).await?,
        total_attendance_records: AttendanceEntity::find().count(db).await?,
        ..Default::default()
    };

    for role in [Role::Student, Role::Faculty, Role::Admin, Role::Superadmin] {
        let count = UserEntity::find()
            .filter(UserColumn::Role.eq(role))
            .count(db)
            .await?;
        stats.role_counts.insert(role.to_string(), count);
    }

    for status in [
        EventStatus::Scheduled,
        EventStatus::Ongoing,
        EventStatus::Completed,
        EventStatus::Cancelled,
    ] {
        let count = EventEntity::find()
            .filter(EventColumn::Status.eq(status))
            .count(db)
            .await?;
        stats.event_status_counts.insert(status.to_string(), count);
    }

    Ok(stats)
}

/// Creates the configured superadmin when no superadmin exists yet.
///
/// Returns `true` when an account was created.
pub async fn ensure_superadmin(
    db: &DatabaseConnection,
    email: &str,
    password: &str,
    now: DateTime<Utc>,
) -> Result<bool, ServiceError> {
    if email.trim().is_empty() || password.is_empty() {
        tracing::debug!("No superadmin credentials configured; skipping bootstrap");
        return Ok(false);
    }

    let existing = UserEntity::find()
        .filter(UserColumn::Role.eq(Role::Superadmin))
        .count(db)
        .await?;
    if existing > 0 {
        return Ok(false);
    }

    let created = user::Model::create(
        db,
        &NewUser {
            student_id: "SUPERADMIN".into(),
            email: email.into(),
            username: "superadmin".into(),
            password: password.into(),
            role: Role::Superadmin,
            first_name: "Super".into(),
            last_name: "Admin".into(),
            middle_name: None,
            course: None,
            year_level: None,
            section: None,
            department: None,
            college: None,
            contact_number: None,
            address: None,
        },
    )
    .await?;

    let mut active = created.into_active_model();
    active.is_verified = Set(true);
    active.verified_at = Set(Some(now));
    active.update(db).await?;

    tracing::info!(email, "Superadmin account created");
    Ok(true)
}
