//! Domain models for challenges and their participants.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ChallengeStatus {
    Active,
    Completed,
    Expired,
}

impl ChallengeStatus {
    /// Convert to string for storage
    pub fn as_str(&self) -> &'static str {
        match self {
            ChallengeStatus::Active => "active",
            ChallengeStatus::Completed => "completed",
            ChallengeStatus::Expired => "expired",
        }
    }

    /// Parse from string for storage loading
    pub fn from_string(s: &str) -> Result<Self, String> {
        match s.to_lowercase().as_str() {
            "active" => Ok(ChallengeStatus::Active),
            "completed" => Ok(ChallengeStatus::Completed),
            "expired" => Ok(ChallengeStatus::Expired),
            _ => Err(format!("Invalid challenge status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Challenge {
    pub id: String,
    pub title: String,
    pub description: String,
    pub goal: String,
    pub total_days: u32,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub is_group: bool,
    pub created_by: String,
    pub status: ChallengeStatus,
    pub created_at: DateTime<Utc>,
}

impl Challenge {
    pub fn generate_id(timestamp_millis: u64) -> String {
        format!("challenge::{}-{}", timestamp_millis, super::habit::random_suffix(4))
    }
}

/// Join/progress record tracking one user inside one challenge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChallengeParticipant {
    pub user_id: String,
    pub challenge_id: String,
    pub progress: u32,
    pub current_day: u32,
    pub completed: bool,
    pub joined_at: DateTime<Utc>,
}
