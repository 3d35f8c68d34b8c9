//! Attendance-rate rollups over the attendance ledger.

use db::models::attendance::{AttendanceStatus, Column as AttendanceColumn, Entity as AttendanceEntity};
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QuerySelect,
};
use serde::Serialize;
use std::str::FromStr;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AttendanceStats {
    /// Number of attendance records in scope.
    pub total_events: u64,
    pub present_count: u64,
    pub absent_count: u64,
    pub late_count: u64,
    pub excused_count: u64,
    /// Percentage of records that count as attended.
    pub attendance_rate: f64,
}

impl AttendanceStats {
    pub fn from_counts(present: u64, absent: u64, late: u64, excused: u64) -> Self {
        let total = present + absent + late + excused;
        let attended = present + late + excused;
        let attendance_rate = if total == 0 {
            0.0
        } else {
            attended as f64 * 100.0 / total as f64
        };

        Self {
            total_events: total,
            present_count: present,
            absent_count: absent,
            late_count: late,
            excused_count: excused,
            attendance_rate,
        }
    }
}

/// Counts records by status, optionally narrowed to a student and/or an event.
pub async fn compute_stats(
    db: &DatabaseConnection,
    student_id: Option<&str>,
    event_id: Option<i64>,
) -> Result<AttendanceStats, DbErr> {
    let mut query = AttendanceEntity::find()
        .select_only()
        .column(AttendanceColumn::Status)
        .column_as(AttendanceColumn::Id.count(), "count")
        .group_by(AttendanceColumn::Status);

    if let Some(student_id) = student_id {
        query = query.filter(AttendanceColumn::StudentId.eq(student_id));
    }
    if let Some(event_id) = event_id {
        query = query.filter(AttendanceColumn::EventId.eq(event_id));
    }

    let rows: Vec<(String, i64)> = query.into_tuple().all(db).await?;

    let (mut present, mut absent, mut late, mut excused) = (0u64, 0u64, 0u64, 0u64);
    for (status, count) in rows {
        let count = count.max(0) as u64;
        match AttendanceStatus::from_str(&status) {
            Ok(AttendanceStatus::Present) => present += count,
            Ok(AttendanceStatus::Absent) => absent += count,
            Ok(AttendanceStatus::Late) => late += count,
            Ok(AttendanceStatus::Excused) => excused += count,
            Err(_) => tracing::warn!(status, "Ignoring unknown attendance status"),
        }
    }

    Ok(AttendanceStats::from_counts(present, absent, late, excused))
}
