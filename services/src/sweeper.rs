//! Periodic promotion of events through scheduled -> ongoing -> completed.

use chrono::{DateTime, Utc};
use db::models::{
    event::{Column as EventColumn, Entity as EventEntity, EventStatus},
    user::{Column as UserColumn, Entity as UserEntity},
};
use sea_orm::{
    ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, QueryFilter, QuerySelect,
    sea_query::{Expr, Query},
};
use std::time::Duration;
use tokio::task::JoinHandle;
use util::state::AppState;

use crate::qr;

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SweepReport {
    pub completed: usize,
    pub started: usize,
    /// Students released from events that had already finished.
    pub released: usize,
}

/// One pass over active events.
///
/// Each transition is a conditional update on the current status, so a pass that
/// races a manual edit or another pass only applies what is still pending. Every
/// pass also reverts students still held by a completed, cancelled or inactive event.
pub async fn sweep(db: &DatabaseConnection, now: DateTime<Utc>) -> Result<SweepReport, DbErr> {
    let mut report = SweepReport::default();

    let ended: Vec<i64> = EventEntity::find()
        .select_only()
        .column(EventColumn::Id)
        .filter(EventColumn::IsActive.eq(true))
        .filter(EventColumn::EndTime.lt(now))
        .filter(EventColumn::Status.is_in([EventStatus::Scheduled, EventStatus::Ongoing]))
        .into_tuple()
        .all(db)
        .await?;

    for event_id in ended {
        let result = EventEntity::update_many()
            .col_expr(EventColumn::Status, Expr::value(EventStatus::Completed))
            .col_expr(EventColumn::UpdatedAt, Expr::value(now))
            .filter(EventColumn::Id.eq(event_id))
            .filter(EventColumn::Status.is_in([EventStatus::Scheduled, EventStatus::Ongoing]))
            .exec(db)
            .await?;

        if result.rows_affected == 1 {
            report.completed += 1;
            if let Err(e) = qr::revert_for_event(db, event_id, now).await {
                tracing::warn!(event_id, error = %e, "QR revert after completion failed");
            }
        }
    }

    let started = EventEntity::update_many()
        .col_expr(EventColumn::Status, Expr::value(EventStatus::Ongoing))
        .col_expr(EventColumn::UpdatedAt, Expr::value(now))
        .filter(EventColumn::IsActive.eq(true))
        .filter(EventColumn::Status.eq(EventStatus::Scheduled))
        .filter(EventColumn::StartTime.lte(now))
        .filter(EventColumn::EndTime.gte(now))
        .exec(db)
        .await?;
    report.started = started.rows_affected as usize;

    report.released = release_stranded(db, now).await?;

    if report.completed > 0 || report.started > 0 || report.released > 0 {
        tracing::info!(
            completed = report.completed,
            started = report.started,
            released = report.released,
            "Event sweep applied"
        );
    }
    Ok(report)
}

/// Reverts students whose slot points at an event that is no longer live.
async fn release_stranded(db: &DatabaseConnection, now: DateTime<Utc>) -> Result<usize, DbErr> {
    let finished = Query::select()
        .column(EventColumn::Id)
        .from(EventEntity)
        .cond_where(
            Condition::any()
                .add(EventColumn::Status.is_in([EventStatus::Completed, EventStatus::Cancelled]))
                .add(EventColumn::IsActive.eq(false)),
        )
        .to_owned();

    let held: Vec<Option<i64>> = UserEntity::find()
        .select_only()
        .column(UserColumn::ActiveEventId)
        .filter(UserColumn::ActiveEventId.in_subquery(finished))
        .distinct()
        .into_tuple()
        .all(db)
        .await?;

    let mut released = 0;
    for event_id in held.into_iter().flatten() {
        match qr::revert_for_event(db, event_id, now).await {
            Ok(report) => released += report.updated,
            Err(e) => tracing::warn!(event_id, error = %e, "QR revert of finished event failed"),
        }
    }
    Ok(released)
}

/// Runs [`sweep`] now and then every `sweep_interval_seconds`.
pub fn spawn(state: &AppState) -> JoinHandle<()> {
    let db = state.db_clone();
    let every = Duration::from_secs(util::config::sweep_interval_seconds().max(1));

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        loop {
            ticker.tick().await;
            if let Err(e) = sweep(&db, Utc::now()).await {
                tracing::error!(error = %e, "Event sweep failed");
            }
        }
    })
}
