use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use chrono::{DateTime, Utc};
use rand::rngs::OsRng;
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue::NotSet, Condition, QueryOrder, Set};
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// QR type recorded for a student's bare identity payload.
pub const STUDENT_QR_TYPE: &str = "student_id";

/// Represents a user in the `users` table.
///
/// Students carry a mutable QR identity. While an event holds the student's QR slot
/// (`active_event_id` set) the pre-rotation payload is parked in the `original_*`
/// shadow fields.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    /// Unique business identifier, e.g. `241005-1234`.
    #[sea_orm(unique)]
    pub student_id: String,
    #[sea_orm(unique)]
    pub email: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
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
    #[serde(skip_serializing)]
    pub verification_code: Option<String>,
    #[serde(skip_serializing)]
    pub verification_expires_at: Option<DateTime<Utc>>,
    pub qr_code_data: Option<String>,
    pub qr_type: String,
    pub qr_generated_at: Option<DateTime<Utc>>,
    pub active_event_id: Option<i64>,
    #[serde(skip_serializing)]
    pub original_qr_code_data: Option<String>,
    #[serde(skip_serializing)]
    pub original_qr_type: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// System-wide role of a user.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    EnumIter,
    DeriveActiveEnum,
    Display,
    EnumString,
    Deserialize,
    Serialize,
)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "user_role")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Role {
    #[sea_orm(string_value = "student")]
    Student,

    #[sea_orm(string_value = "faculty")]
    Faculty,

    #[sea_orm(string_value = "admin")]
    Admin,

    #[sea_orm(string_value = "superadmin")]
    Superadmin,
}

impl Role {
    /// Faculty, admin and superadmin may act on behalf of students and manage events.
    pub fn is_staff(self) -> bool {
        match self {
            Role::Student => false,
            Role::Faculty | Role::Admin | Role::Superadmin => true,
        }
    }

    /// Admin and superadmin receive attendance notifications.
    pub fn is_admin(self) -> bool {
        matches!(self, Role::Admin | Role::Superadmin)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Fields accepted when creating a user row.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub student_id: String,
    pub email: String,
    pub username: String,
    pub password: String,
    pub role: Role,
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
}

impl Model {
    /// Inserts a new user with an argon2 hash of `new.password`.
    ///
    /// The row starts unverified and without a QR payload; both are set on verification.
    pub async fn create(db: &DatabaseConnection, new: &NewUser) -> Result<Model, DbErr> {
        let now = Utc::now();
        let active = ActiveModel {
            id: NotSet,
            student_id: Set(new.student_id.trim().to_string()),
            email: Set(new.email.trim().to_lowercase()),
            username: Set(new.username.trim().to_string()),
            password_hash: Set(Self::hash_password(&new.password)?),
            role: Set(new.role),
            first_name: Set(new.first_name.trim().to_string()),
            last_name: Set(new.last_name.trim().to_string()),
            middle_name: Set(clean(&new.middle_name)),
            course: Set(clean(&new.course).map(|c| c.to_uppercase())),
            year_level: Set(clean(&new.year_level)),
            section: Set(clean(&new.section)),
            department: Set(clean(&new.department)),
            college: Set(clean(&new.college)),
            contact_number: Set(clean(&new.contact_number)),
            address: Set(clean(&new.address)),
            is_verified: Set(false),
            verified_at: Set(None),
            verification_code: Set(None),
            verification_expires_at: Set(None),
            qr_code_data: Set(None),
            qr_type: Set(STUDENT_QR_TYPE.to_string()),
            qr_generated_at: Set(None),
            active_event_id: Set(None),
            original_qr_code_data: Set(None),
            original_qr_type: Set(None),
            created_at: Set(now),
            updated_at: Set(now),
        };

        active.insert(db).await
    }

    pub fn hash_password(password: &str) -> Result<String, DbErr> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| DbErr::Custom(format!("password hashing failed: {e}")))
    }

    pub fn verify_password(&self, password: &str) -> bool {
        match PasswordHash::new(&self.password_hash) {
            Ok(parsed) => Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }

    pub async fn find_by_student_id(
        db: &DatabaseConnection,
        student_id: &str,
    ) -> Result<Option<Model>, DbErr> {
        Entity::find()
            .filter(Column::StudentId.eq(student_id))
            .one(db)
            .await
    }

    pub async fn find_by_email(db: &DatabaseConnection, email: &str) -> Result<Option<Model>, DbErr> {
        Entity::find()
            .filter(Column::Email.eq(email.trim().to_lowercase()))
            .one(db)
            .await
    }

    /// Looks a user up by student id or email.
    pub async fn find_by_identifier(
        db: &DatabaseConnection,
        identifier: &str,
    ) -> Result<Option<Model>, DbErr> {
        let identifier = identifier.trim();
        Entity::find()
            .filter(
                Condition::any()
                    .add(Column::StudentId.eq(identifier))
                    .add(Column::Email.eq(identifier.to_lowercase())),
            )
            .one(db)
            .await
    }

    /// Every admin and superadmin, oldest first.
    pub async fn find_admins(db: &DatabaseConnection) -> Result<Vec<Model>, DbErr> {
        Entity::find()
            .filter(Column::Role.is_in([Role::Admin, Role::Superadmin]))
            .order_by_asc(Column::Id)
            .all(db)
            .await
    }

    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

fn clean(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
