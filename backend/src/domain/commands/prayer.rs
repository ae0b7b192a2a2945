//! Commands and results for prayer operations.

use crate::domain::models::prayer::PrayerRecord;

#[derive(Debug, Clone)]
pub struct LogTodayCommand {
    pub user_id: String,
}

#[derive(Debug, Clone)]
pub struct LogTodayResult {
    pub prayers: Vec<PrayerRecord>,
    /// False when today's records already existed (idempotent call)
    pub created: bool,
}

#[derive(Debug, Clone)]
pub struct GetTodayCommand {
    pub user_id: String,
}

#[derive(Debug, Clone)]
pub struct GetTodayResult {
    pub prayers: Vec<PrayerRecord>,
}

#[derive(Debug, Clone)]
pub struct CompletePrayerCommand {
    pub user_id: String,
    pub prayer_id: String,
}

#[derive(Debug, Clone)]
pub struct CompletePrayerResult {
    pub prayer: PrayerRecord,
    /// True when this completion triggered the daily reward grant
    pub reward_granted: bool,
}
