//! File-based user repository using filesystem discovery.
//!
//! Each user owns one directory under the data root, named after their
//! username, holding a `profile.yaml` document plus that user's habit and
//! prayer files. Users are discovered by scanning directories for a valid
//! profile document.

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use super::connection::FsConnection;
use crate::domain::models::user::User;
use crate::storage::traits::UserStorage;

/// Intermediate struct for YAML serialization with string date fields
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ProfileRecord {
    id: String,
    username: String,
    email: String,
    full_name: String,
    avatar: Option<String>,
    daily_score: u32,
    streak_count: u32,
    xp: u32,
    level: u32,
    badges: Vec<String>,
    last_reward_date: Option<String>,
    last_activity: Option<String>,
    created_at: String,
    updated_at: String,
}

impl From<&User> for ProfileRecord {
    fn from(user: &User) -> Self {
        ProfileRecord {
            id: user.id.clone(),
            username: user.username.clone(),
            email: user.email.clone(),
            full_name: user.full_name.clone(),
            avatar: user.avatar.clone(),
            daily_score: user.daily_score,
            streak_count: user.streak_count,
            xp: user.xp,
            level: user.level,
            badges: user.badges.clone(),
            last_reward_date: user
                .last_reward_date
                .map(|d| d.format("%Y-%m-%d").to_string()),
            last_activity: user.last_activity.map(|t| t.to_rfc3339()),
            created_at: user.created_at.to_rfc3339(),
            updated_at: user.updated_at.to_rfc3339(),
        }
    }
}

impl TryFrom<ProfileRecord> for User {
    type Error = anyhow::Error;

    fn try_from(record: ProfileRecord) -> Result<Self> {
        Ok(User {
            id: record.id,
            username: record.username,
            email: record.email,
            full_name: record.full_name,
            avatar: record.avatar,
            daily_score: record.daily_score,
            streak_count: record.streak_count,
            xp: record.xp,
            level: record.level,
            badges: record.badges,
            last_reward_date: record
                .last_reward_date
                .map(|d| {
                    NaiveDate::parse_from_str(&d, "%Y-%m-%d")
                        .map_err(|e| anyhow::anyhow!("Failed to parse last_reward_date: {}", e))
                })
                .transpose()?,
            last_activity: record
                .last_activity
                .map(|t| parse_utc(&t, "last_activity"))
                .transpose()?,
            created_at: parse_utc(&record.created_at, "created_at")?,
            updated_at: parse_utc(&record.updated_at, "updated_at")?,
        })
    }
}

fn parse_utc(value: &str, field: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(value)
        .map_err(|e| anyhow::anyhow!("Failed to parse {}: {}", field, e))?
        .with_timezone(&Utc))
}

#[derive(Clone)]
pub struct UserRepository {
    connection: FsConnection,
}

impl UserRepository {
    pub fn new(connection: FsConnection) -> Self {
        Self { connection }
    }

    /// Generate a safe filesystem identifier from a username:
    /// "Abdul Rahman" -> "abdul_rahman"
    pub fn generate_safe_directory_name(username: &str) -> String {
        let mapped = username
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() {
                    c.to_ascii_lowercase()
                } else {
                    '_'
                }
            })
            .collect::<String>();

        // Collapse consecutive underscores
        let mut collapsed = String::new();
        let mut last_was_underscore = false;
        for c in mapped.chars() {
            if c == '_' {
                if !last_was_underscore {
                    collapsed.push('_');
                }
                last_was_underscore = true;
            } else {
                collapsed.push(c);
                last_was_underscore = false;
            }
        }

        collapsed.trim_matches('_').to_string()
    }

    fn profile_path(&self, directory_name: &str) -> PathBuf {
        self.connection.user_directory(directory_name).join("profile.yaml")
    }

    /// Find the directory that holds the user with the given ID
    pub fn find_user_directory(&self, user_id: &str) -> Result<Option<String>> {
        for (directory_name, user) in self.discover_users()? {
            if user.id == user_id {
                return Ok(Some(directory_name));
            }
        }
        Ok(None)
    }

    /// Discover all users by scanning directories for profile documents
    fn discover_users(&self) -> Result<Vec<(String, User)>> {
        let base_dir = self.connection.base_directory();
        if !base_dir.exists() {
            return Ok(Vec::new());
        }

        let mut users = Vec::new();
        for entry in fs::read_dir(base_dir)? {
            let entry = entry?;
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }
            let directory_name = match path.file_name().and_then(|n| n.to_str()) {
                Some(name) => name.to_string(),
                None => {
                    warn!("Skipping directory with invalid name: {:?}", path);
                    continue;
                }
            };
            match self.load_user_from_directory(&directory_name) {
                Ok(Some(user)) => users.push((directory_name, user)),
                Ok(None) => debug!("Directory {} has no profile document", directory_name),
                Err(e) => warn!("Error loading profile from {}: {}", directory_name, e),
            }
        }

        users.sort_by(|a, b| a.1.username.cmp(&b.1.username));
        Ok(users)
    }

    fn load_user_from_directory(&self, directory_name: &str) -> Result<Option<User>> {
        let yaml_path = self.profile_path(directory_name);
        if !yaml_path.exists() {
            return Ok(None);
        }
        let contents = fs::read_to_string(&yaml_path)?;
        let record: ProfileRecord = serde_yaml::from_str(&contents)?;
        Ok(Some(User::try_from(record)?))
    }

    fn save_user_to_directory(&self, user: &User, directory_name: &str) -> Result<()> {
        let user_dir = self.connection.user_directory(directory_name);
        if !user_dir.exists() {
            fs::create_dir_all(&user_dir)?;
            info!("Created user directory: {:?}", user_dir);
        }

        let record = ProfileRecord::from(user);
        let yaml = serde_yaml::to_string(&record)?;
        self.connection
            .write_atomic(&self.profile_path(directory_name), yaml.as_bytes())?;
        Ok(())
    }
}

impl UserStorage for UserRepository {
    fn store_user(&self, user: &User) -> Result<()> {
        // Usernames are not unique; probe for a free directory name.
        let base_name = Self::generate_safe_directory_name(&user.username);
        let mut directory_name = base_name.clone();
        let mut attempt = 1;
        while self.profile_path(&directory_name).exists() {
            attempt += 1;
            directory_name = format!("{}_{}", base_name, attempt);
        }

        self.save_user_to_directory(user, &directory_name)?;
        debug!("Stored user {} in directory {}", user.id, directory_name);
        Ok(())
    }

    fn get_user(&self, user_id: &str) -> Result<Option<User>> {
        for (_, user) in self.discover_users()? {
            if user.id == user_id {
                return Ok(Some(user));
            }
        }
        Ok(None)
    }

    fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let needle = email.to_lowercase();
        for (_, user) in self.discover_users()? {
            if user.email.to_lowercase() == needle {
                return Ok(Some(user));
            }
        }
        Ok(None)
    }

    fn list_users(&self) -> Result<Vec<User>> {
        Ok(self.discover_users()?.into_iter().map(|(_, user)| user).collect())
    }

    fn update_user(&self, user: &User) -> Result<()> {
        let directory_name = self
            .find_user_directory(&user.id)?
            .ok_or_else(|| anyhow::anyhow!("User not found: {}", user.id))?;
        self.save_user_to_directory(user, &directory_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn test_user(id: &str, username: &str, email: &str) -> User {
        let now = Utc::now();
        User {
            id: id.to_string(),
            username: username.to_string(),
            email: email.to_string(),
            full_name: "Test User".to_string(),
            avatar: None,
            daily_score: 0,
            streak_count: 0,
            xp: 0,
            level: 1,
            badges: Vec::new(),
            last_reward_date: None,
            last_activity: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn setup() -> (UserRepository, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let connection = FsConnection::new(temp_dir.path()).expect("Failed to create connection");
        (UserRepository::new(connection), temp_dir)
    }

    #[test]
    fn test_store_and_get_user() {
        let (repo, _temp_dir) = setup();
        let user = test_user("user::1", "amina", "amina@example.com");

        repo.store_user(&user).expect("Failed to store user");

        let loaded = repo
            .get_user("user::1")
            .expect("Failed to get user")
            .expect("User should exist");
        assert_eq!(loaded, user);
    }

    #[test]
    fn test_find_by_email_is_case_insensitive() {
        let (repo, _temp_dir) = setup();
        repo.store_user(&test_user("user::1", "amina", "amina@example.com"))
            .expect("Failed to store user");

        let found = repo
            .find_user_by_email("Amina@Example.com")
            .expect("Failed to query");
        assert!(found.is_some());
    }

    #[test]
    fn test_duplicate_usernames_get_distinct_directories() {
        let (repo, _temp_dir) = setup();
        repo.store_user(&test_user("user::1", "amina", "a@example.com"))
            .expect("Failed to store first");
        repo.store_user(&test_user("user::2", "amina", "b@example.com"))
            .expect("Failed to store second");

        let users = repo.list_users().expect("Failed to list");
        assert_eq!(users.len(), 2);
    }

    #[test]
    fn test_update_user_persists_gamification_state() {
        let (repo, _temp_dir) = setup();
        let mut user = test_user("user::1", "amina", "amina@example.com");
        repo.store_user(&user).expect("Failed to store user");

        user.xp = 70;
        user.streak_count = 3;
        user.badges.push("Weekly Prayers Streak".to_string());
        user.last_reward_date = NaiveDate::from_ymd_opt(2024, 1, 15);
        repo.update_user(&user).expect("Failed to update user");

        let loaded = repo.get_user("user::1").unwrap().unwrap();
        assert_eq!(loaded.xp, 70);
        assert_eq!(loaded.streak_count, 3);
        assert_eq!(loaded.badges, vec!["Weekly Prayers Streak".to_string()]);
        assert_eq!(loaded.last_reward_date, NaiveDate::from_ymd_opt(2024, 1, 15));
    }

    #[test]
    fn test_safe_directory_name() {
        assert_eq!(
            UserRepository::generate_safe_directory_name("Abdul Rahman"),
            "abdul_rahman"
        );
        assert_eq!(UserRepository::generate_safe_directory_name("a--b"), "a_b");
        assert_eq!(UserRepository::generate_safe_directory_name("_x_"), "x");
    }
}
