//! # Storage Traits
//!
//! Storage abstraction traits that let the domain layer work against
//! different backends without modification. All operations are synchronous;
//! each request performs a single read-modify-write against one owning
//! document.

use anyhow::Result;
use chrono::NaiveDate;

use crate::domain::models::challenge::{Challenge, ChallengeParticipant};
use crate::domain::models::group::{Group, GroupMembership};
use crate::domain::models::habit::Habit;
use crate::domain::models::prayer::PrayerRecord;
use crate::domain::models::user::User;

/// Interface for user profile storage operations
pub trait UserStorage: Send + Sync {
    /// Store a new user
    fn store_user(&self, user: &User) -> Result<()>;

    /// Retrieve a specific user by ID
    fn get_user(&self, user_id: &str) -> Result<Option<User>>;

    /// Find a user by email (emails are unique)
    fn find_user_by_email(&self, email: &str) -> Result<Option<User>>;

    /// List all users
    fn list_users(&self) -> Result<Vec<User>>;

    /// Update an existing user
    fn update_user(&self, user: &User) -> Result<()>;
}

/// Interface for habit document storage operations
pub trait HabitStorage: Send + Sync {
    /// Store a new habit document
    fn store_habit(&self, habit: &Habit) -> Result<()>;

    /// Retrieve one habit owned by the given user
    fn get_habit(&self, user_id: &str, habit_id: &str) -> Result<Option<Habit>>;

    /// List all habits owned by the given user
    fn list_habits(&self, user_id: &str) -> Result<Vec<Habit>>;

    /// Replace an existing habit document
    fn update_habit(&self, habit: &Habit) -> Result<()>;

    /// Delete a habit; returns true if it existed
    fn delete_habit(&self, user_id: &str, habit_id: &str) -> Result<bool>;
}

/// Interface for prayer record storage operations
pub trait PrayerStorage: Send + Sync {
    /// Append a batch of new prayer records
    fn store_prayers(&self, user_id: &str, records: &[PrayerRecord]) -> Result<()>;

    /// All of one user's records for one calendar date
    fn list_prayers_for_date(&self, user_id: &str, date: NaiveDate) -> Result<Vec<PrayerRecord>>;

    /// Retrieve one record by ID
    fn get_prayer(&self, user_id: &str, prayer_id: &str) -> Result<Option<PrayerRecord>>;

    /// Update an existing record in place
    fn update_prayer(&self, user_id: &str, record: &PrayerRecord) -> Result<()>;
}

/// Interface for challenge and participant storage operations
pub trait ChallengeStorage: Send + Sync {
    fn store_challenge(&self, challenge: &Challenge) -> Result<()>;

    fn get_challenge(&self, challenge_id: &str) -> Result<Option<Challenge>>;

    fn update_challenge(&self, challenge: &Challenge) -> Result<()>;

    /// Store a new participant row
    fn store_participant(&self, participant: &ChallengeParticipant) -> Result<()>;

    /// The (user, challenge) participant row, if the user has joined
    fn get_participant(
        &self,
        user_id: &str,
        challenge_id: &str,
    ) -> Result<Option<ChallengeParticipant>>;

    fn list_participants_for_user(&self, user_id: &str) -> Result<Vec<ChallengeParticipant>>;

    fn list_participants_for_challenge(
        &self,
        challenge_id: &str,
    ) -> Result<Vec<ChallengeParticipant>>;

    fn update_participant(&self, participant: &ChallengeParticipant) -> Result<()>;
}

/// Interface for group and membership storage operations
pub trait GroupStorage: Send + Sync {
    fn store_group(&self, group: &Group) -> Result<()>;

    fn get_group(&self, group_id: &str) -> Result<Option<Group>>;

    fn store_membership(&self, membership: &GroupMembership) -> Result<()>;

    fn membership_exists(&self, group_id: &str, user_id: &str) -> Result<bool>;
}
