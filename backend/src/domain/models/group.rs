//! Domain models for groups and group membership.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: String,
    pub name: String,
    pub description: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
}

impl Group {
    pub fn generate_id(timestamp_millis: u64) -> String {
        format!("group::{}-{}", timestamp_millis, super::habit::random_suffix(4))
    }
}

/// At most one membership exists per (group, user).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupMembership {
    pub group_id: String,
    pub user_id: String,
    pub joined_at: DateTime<Utc>,
}
