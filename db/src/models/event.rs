use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use super::user::Role;

/// A time-boxed campus activity that students check in to.
///
/// `course`, `year_level` and `department` form an optional single-course
/// restriction; `tagged_courses` is an uppercase, comma-joined allow-list.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize)]
#[sea_orm(table_name = "events")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub event_date: NaiveDate,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub location: Option<String>,
    pub course: Option<String>,
    pub section: Option<String>,
    pub year_level: Option<String>,
    pub department: Option<String>,
    pub college: Option<String>,
    pub tagged_courses: Option<String>,
    /// Student id of the creator.
    pub created_by: String,
    pub created_by_role: Role,
    pub status: EventStatus,
    pub is_active: bool,
    pub qr_code_data: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

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
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "event_status")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum EventStatus {
    #[sea_orm(string_value = "scheduled")]
    Scheduled,

    #[sea_orm(string_value = "ongoing")]
    Ongoing,

    #[sea_orm(string_value = "completed")]
    Completed,

    #[sea_orm(string_value = "cancelled")]
    Cancelled,
}

impl EventStatus {
    /// Completed and cancelled events never change status again.
    pub fn is_terminal(self) -> bool {
        matches!(self, EventStatus::Completed | EventStatus::Cancelled)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::attendance::Entity")]
    Attendances,
}

impl Related<super::attendance::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Attendances.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Uppercases and trims course codes, dropping blanks. `None` when nothing remains.
pub fn join_courses<S: AsRef<str>>(courses: &[S]) -> Option<String> {
    let cleaned: Vec<String> = courses
        .iter()
        .map(|c| c.as_ref().trim().to_uppercase())
        .filter(|c| !c.is_empty())
        .collect();

    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned.join(","))
    }
}

/// Splits a stored allow-list back into normalized course codes.
pub fn split_courses(csv: Option<&str>) -> Vec<String> {
    csv.map(|raw| {
        raw.split(',')
            .map(|c| c.trim().to_uppercase())
            .filter(|c| !c.is_empty())
            .collect()
    })
    .unwrap_or_default()
}

impl Model {
    pub fn tagged_course_list(&self) -> Vec<String> {
        split_courses(self.tagged_courses.as_deref())
    }

    /// Courses whose students get an event-scoped QR while this event is relevant.
    ///
    /// Tagged courses win; otherwise a primary course paired with a year level.
    pub fn rotation_courses(&self) -> Vec<String> {
        let tagged = self.tagged_course_list();
        if !tagged.is_empty() {
            return tagged;
        }
        match (non_blank(&self.course), non_blank(&self.year_level)) {
            (Some(course), Some(_)) => vec![course.to_uppercase()],
            _ => Vec::new(),
        }
    }

    pub async fn find_active(db: &DatabaseConnection, id: i64) -> Result<Option<Model>, DbErr> {
        Entity::find_by_id(id)
            .filter(Column::IsActive.eq(true))
            .one(db)
            .await
    }
}

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}
