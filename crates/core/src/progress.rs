use chrono::{DateTime, NaiveDate, Utc};

use crate::time::start_of_day;

/// Status string that short-circuits progress to 100.
pub const COMPLETED_STATUS: &str = "Completed";

/// Display progress of a course schedule at `now`, in `0.0..=100.0`.
///
/// Dates are taken as midnight UTC. A missing date gives 0, a zero-length window
/// that has started gives 100.
#[must_use]
pub fn course_progress(
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    status: &str,
    now: DateTime<Utc>,
) -> f64 {
    if status == COMPLETED_STATUS {
        return 100.0;
    }
    let (Some(start), Some(end)) = (start, end) else {
        return 0.0;
    };
    let (start, end) = (start_of_day(start), start_of_day(end));
    if now < start {
        return 0.0;
    }
    if now >= end {
        return 100.0;
    }
    let total = (end - start).num_milliseconds();
    if total <= 0 {
        return 100.0;
    }
    let elapsed = (now - start).num_milliseconds();
    #[allow(clippy::cast_precision_loss)]
    let percent = 100.0 * elapsed as f64 / total as f64;
    percent.clamp(0.0, 100.0)
}
