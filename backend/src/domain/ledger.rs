//! Daily progress ledger and streak calculation.
//!
//! The ledger is the ordered set of per-day completion records belonging to
//! one habit. Everything here is a pure function over `DayRecord` slices:
//! the habit service owns persistence and the monotone longest-streak rule;
//! this module owns generation, today-only toggling, and streak derivation.

use chrono::{DateTime, Duration, NaiveDate, Utc};

use crate::domain::models::habit::DayRecord;

/// Streaks derived from a ledger. `current` is measured backward from
/// "today"; `longest` is the best run anywhere in the window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreakSummary {
    pub current: u32,
    pub longest: u32,
}

/// Produce `duration_days` consecutive day records starting at
/// `start_date`, all incomplete. Deterministic: identical inputs yield an
/// identical ledger.
pub fn generate(start_date: NaiveDate, duration_days: u32) -> Vec<DayRecord> {
    (0..duration_days)
        .map(|offset| DayRecord {
            date: start_date + Duration::days(offset as i64),
            completed: false,
            completed_at: None,
        })
        .collect()
}

/// Flip the completion state of today's record.
///
/// Returns the new `completed` state, or `None` when the ledger window does
/// not cover `today`. Records for past or future dates are immutable
/// through this operation; that is what rules out retroactive streak
/// manipulation.
pub fn toggle_today(
    records: &mut [DayRecord],
    today: NaiveDate,
    now: DateTime<Utc>,
) -> Option<bool> {
    let record = records.iter_mut().find(|record| record.date == today)?;
    record.completed = !record.completed;
    record.completed_at = if record.completed { Some(now) } else { None };
    Some(record.completed)
}

/// Recompute both streaks from scratch.
///
/// The input is expected to already be date-ordered, but the computation
/// sorts its own view so the result never depends on originating order.
pub fn compute_streaks(records: &[DayRecord], today: NaiveDate) -> StreakSummary {
    let mut ordered: Vec<&DayRecord> = records.iter().collect();
    ordered.sort_by_key(|record| record.date);

    let mut longest = 0u32;
    let mut run = 0u32;
    for record in &ordered {
        if record.completed {
            run += 1;
            longest = longest.max(run);
        } else {
            run = 0;
        }
    }

    // Current streak walks backward from today's record; today outside the
    // window means no current streak regardless of history.
    let mut current = 0u32;
    if let Some(today_index) = ordered.iter().position(|record| record.date == today) {
        for record in ordered[..=today_index].iter().rev() {
            if record.completed {
                current += 1;
            } else {
                break;
            }
        }
    }

    StreakSummary { current, longest }
}
