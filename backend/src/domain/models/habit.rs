//! Domain model for a habit and its daily progress ledger.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One day inside a habit's ledger. Day records have no identity outside
/// their parent habit; they are addressed by date only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayRecord {
    pub date: NaiveDate,
    pub completed: bool,
    /// Set and cleared in lockstep with `completed`
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Habit {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub description: String,
    /// Cosmetic classification, no behavioral effect
    pub category: String,
    pub icon: String,
    pub start_date: NaiveDate,
    /// `start_date + duration_days - 1`, inclusive
    pub end_date: NaiveDate,
    pub duration_days: u32,
    /// Exactly `duration_days` records, dates strictly increasing by one day.
    /// Generated at creation and never resized.
    pub daily_progress: Vec<DayRecord>,
    /// Derived from the ledger; only the streak calculator writes these.
    pub current_streak: u32,
    /// Monotonically non-decreasing
    pub longest_streak: u32,
    pub is_completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Habit {
    /// Generate a unique habit ID: `habit::<timestamp_ms>-<random_suffix>`
    pub fn generate_id(timestamp_millis: u64) -> String {
        format!("habit::{}-{}", timestamp_millis, random_suffix(4))
    }

    /// Last calendar date covered by a window starting at `start_date`
    pub fn end_date_for(start_date: NaiveDate, duration_days: u32) -> NaiveDate {
        start_date + Duration::days(duration_days as i64 - 1)
    }

    pub fn all_days_completed(&self) -> bool {
        self.daily_progress.iter().all(|record| record.completed)
    }
}

/// Generate a short hex suffix for IDs created in the same millisecond
pub(crate) fn random_suffix(len: usize) -> String {
    let now = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("Time went backwards")
        .as_nanos();
    format!("{:x}", now % (16_u128.pow(len as u32)))
        .chars()
        .take(len)
        .collect()
}
