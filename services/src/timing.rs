//! Check-in windows and early/on-time/late classification.

use chrono::{DateTime, Duration, Utc};
use db::models::{attendance::TimingStatus, user::Role};

use crate::error::ServiceError;

/// Arriving more than this before the expected time counts as early.
pub const EARLY_MINUTES: i64 = 5;
/// Late grace for check-in against the event start.
pub const CHECK_IN_GRACE_MINUTES: i64 = 15;
/// Students may check in this long before the event starts.
pub const STUDENT_OPENS_BEFORE_MINUTES: i64 = 30;
/// Staff may record check-ins up to this long after the event ends.
pub const STAFF_CLOSES_AFTER_HOURS: i64 = 24;

/// `early` before `expected - 5min`, `late` after `expected + grace`, otherwise `on_time`.
///
/// Both boundaries are inclusive for `on_time`.
pub fn classify(actual: DateTime<Utc>, expected: DateTime<Utc>, grace: Duration) -> TimingStatus {
    if actual < expected - Duration::minutes(EARLY_MINUTES) {
        TimingStatus::Early
    } else if actual > expected + grace {
        TimingStatus::Late
    } else {
        TimingStatus::OnTime
    }
}

pub fn check_in_grace() -> Duration {
    Duration::minutes(CHECK_IN_GRACE_MINUTES)
}

/// Check-outs are late as soon as the event end has passed.
pub fn check_out_grace() -> Duration {
    Duration::zero()
}

/// Rejects a check-in outside the window allowed for `actor_role`.
pub fn ensure_check_in_window(
    actor_role: Role,
    now: DateTime<Utc>,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Result<(), ServiceError> {
    if actor_role.is_staff() {
        if now > end + Duration::hours(STAFF_CLOSES_AFTER_HOURS) {
            return Err(ServiceError::state(
                "event has ended more than 24 hours ago. Check-in is no longer allowed",
            ));
        }
        return Ok(());
    }

    let opens_at = start - Duration::minutes(STUDENT_OPENS_BEFORE_MINUTES);
    if now < opens_at {
        let hours = (opens_at - now).num_seconds() as f64 / 3600.0;
        return Err(ServiceError::State(format!(
            "event check-in not yet available. Available in {hours:.0} hours"
        )));
    }
    if now > end {
        return Err(ServiceError::state(
            "event has already ended. Check-in is no longer allowed",
        ));
    }
    Ok(())
}
