use chrono::{DateTime, Utc};
use sea_orm::PaginatorTrait;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::user::Role;

/// Default `method` for records created by a scan.
pub const DEFAULT_METHOD: &str = "qr_scan";

/// One attendance record per (event, student) pair.
///
/// Uniqueness is enforced by `uq_attendances_event_student`; the student is
/// referenced by business key so records survive account churn.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "attendances")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub event_id: i64,
    pub student_id: String,
    pub status: AttendanceStatus,
    pub marked_at: DateTime<Utc>,
    pub marked_by: String,
    pub marked_by_role: Role,
    pub method: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub notes: Option<String>,
    pub check_in_time: Option<DateTime<Utc>>,
    pub check_out_time: Option<DateTime<Utc>>,
    pub check_in_status: Option<TimingStatus>,
    pub check_out_status: Option<TimingStatus>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Aggregate outcome of a record.
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
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "attendance_status")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum AttendanceStatus {
    #[sea_orm(string_value = "present")]
    Present,

    #[sea_orm(string_value = "absent")]
    Absent,

    #[sea_orm(string_value = "late")]
    Late,

    #[sea_orm(string_value = "excused")]
    Excused,
}

/// How a check-in or check-out compared with the scheduled time.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    EnumIter,
    DeriveActiveEnum,
    Display,
    EnumString,
    Deserialize,
    Serialize,
)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "timing_status")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum TimingStatus {
    #[sea_orm(string_value = "early")]
    Early,

    #[sea_orm(string_value = "on_time")]
    OnTime,

    #[sea_orm(string_value = "late")]
    Late,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::event::Entity",
        from = "Column::EventId",
        to = "super::event::Column::Id"
    )]
    Event,
}

impl Related<super::event::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Event.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn find_for_pair(
        db: &DatabaseConnection,
        event_id: i64,
        student_id: &str,
    ) -> Result<Option<Model>, DbErr> {
        Entity::find()
            .filter(Column::EventId.eq(event_id))
            .filter(Column::StudentId.eq(student_id))
            .one(db)
            .await
    }

    pub async fn count_for_student(db: &DatabaseConnection, student_id: &str) -> Result<u64, DbErr> {
        Entity::find()
            .filter(Column::StudentId.eq(student_id))
            .count(db)
            .await
    }

    pub async fn count_for_event(db: &DatabaseConnection, event_id: i64) -> Result<u64, DbErr> {
        Entity::find()
            .filter(Column::EventId.eq(event_id))
            .count(db)
            .await
    }
}
