use serde::{Deserialize, Serialize};

/// A single day inside a habit's progress ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DayRecordDto {
    /// Calendar date of this entry (YYYY-MM-DD)
    pub date: String,
    pub completed: bool,
    /// Set when the day was marked complete (RFC 3339), cleared on un-toggle
    pub completed_at: Option<String>,
}

/// A habit with its full daily progress ledger and derived streak state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitDto {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub description: String,
    /// Cosmetic classification, no behavioral effect
    pub category: String,
    pub icon: String,
    /// First day of the habit window (YYYY-MM-DD)
    pub start_date: String,
    /// Last day of the habit window (YYYY-MM-DD), inclusive
    pub end_date: String,
    pub duration_days: u32,
    /// Exactly `duration_days` entries, one per day of the window
    pub daily_progress: Vec<DayRecordDto>,
    pub current_streak: u32,
    pub longest_streak: u32,
    pub is_completed: bool,
    /// Set once, when the final day of the ledger is completed (RFC 3339)
    pub completed_at: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateHabitRequest {
    pub title: String,
    pub duration_days: u32,
    /// Defaults to today when omitted (YYYY-MM-DD)
    pub start_date: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub icon: Option<String>,
}

/// Fields that may change while a habit is active. The schedule and the
/// ledger shape are fixed at creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateHabitRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub icon: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HabitListResponse {
    pub habits: Vec<HabitDto>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkDayCompleteResponse {
    pub habit: HabitDto,
    /// True only on the toggle that completed the final open day
    pub newly_completed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeleteHabitResponse {
    pub message: String,
}

/// One prayer slot for one user on one calendar date.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrayerRecordDto {
    pub id: String,
    pub user_id: String,
    /// One of: Fajar, Dhuhr, Asr, Maghrib, Isha, Tahajjud
    pub prayer_name: String,
    /// Calendar date of the slot (YYYY-MM-DD)
    pub date: String,
    pub is_completed: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TodayPrayersResponse {
    pub prayers: Vec<PrayerRecordDto>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletePrayerResponse {
    pub prayer: PrayerRecordDto,
    pub message: String,
}

/// User profile together with the gamification aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserDto {
    pub id: String,
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub avatar: Option<String>,
    pub daily_score: u32,
    pub streak_count: u32,
    pub xp: u32,
    pub level: u32,
    pub badges: Vec<String>,
    /// Last day a daily prayer reward was granted (YYYY-MM-DD)
    pub last_reward_date: Option<String>,
    pub last_activity: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisterUserRequest {
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub avatar: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateAccountRequest {
    pub full_name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChallengeDto {
    pub id: String,
    pub title: String,
    pub description: String,
    pub goal: String,
    pub total_days: u32,
    pub start_date: String,
    pub end_date: String,
    pub is_group: bool,
    pub created_by: String,
    /// One of: active, completed, expired
    pub status: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateChallengeRequest {
    pub title: String,
    pub description: String,
    pub goal: String,
    pub total_days: u32,
    pub is_group: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChallengeParticipantDto {
    pub user_id: String,
    pub challenge_id: String,
    pub progress: u32,
    pub current_day: u32,
    pub completed: bool,
    pub joined_at: String,
}

/// A participant row paired with the challenge it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MyChallengeEntry {
    pub participant: ChallengeParticipantDto,
    pub challenge: ChallengeDto,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MyChallengesResponse {
    pub entries: Vec<MyChallengeEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChallengeDetailResponse {
    pub challenge: ChallengeDto,
    pub participants: Vec<ChallengeParticipantDto>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupDto {
    pub id: String,
    pub name: String,
    pub description: String,
    pub created_by: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateGroupRequest {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupMembershipDto {
    pub group_id: String,
    pub user_id: String,
    pub joined_at: String,
}
