//! Domain model for a user and their gamification aggregate.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A registered user. The gamification fields form one aggregate mutated by
/// the prayer reward engine and by challenge completion; nothing else
/// writes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    /// Stored trimmed and lowercase
    pub username: String,
    /// Unique across users
    pub email: String,
    pub full_name: String,
    pub avatar: Option<String>,
    pub daily_score: u32,
    /// Consecutive calendar days with all mandatory prayers completed
    pub streak_count: u32,
    pub xp: u32,
    pub level: u32,
    /// Earned badge names, no duplicates
    pub badges: Vec<String>,
    /// Guard against double-rewarding within the same day
    pub last_reward_date: Option<NaiveDate>,
    pub last_activity: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Generate a unique ID for a user
    pub fn generate_id(timestamp_millis: u64) -> String {
        format!("user::{}", timestamp_millis)
    }

    /// Append a badge unless it is already present
    pub fn award_badge(&mut self, badge: &str) {
        if !self.badges.iter().any(|b| b == badge) {
            self.badges.push(badge.to_string());
        }
    }
}
