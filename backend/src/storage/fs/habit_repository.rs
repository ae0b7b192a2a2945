//! File-based habit repository.
//!
//! Habits are stored as one JSON document array per user
//! (`{user_directory}/habits.json`). A habit document embeds its full daily
//! progress ledger, so every mutation is a single read-modify-write of the
//! owning document set.
//!
//! ## File Structure
//!
//! ```text
//! data/
//! └── {username}/
//!     ├── profile.yaml
//!     ├── habits.json    ← This module manages these files
//!     └── prayers.csv
//! ```

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use super::connection::FsConnection;
use super::user_repository::UserRepository;
use crate::domain::models::habit::{DayRecord, Habit};
use crate::storage::traits::HabitStorage;

/// JSON document structure for a single day record
#[derive(Debug, Clone, Serialize, Deserialize)]
struct DayRecordDocument {
    date: String,
    completed: bool,
    completed_at: Option<String>,
}

/// JSON document structure for a habit
#[derive(Debug, Clone, Serialize, Deserialize)]
struct HabitDocument {
    id: String,
    user_id: String,
    title: String,
    description: String,
    category: String,
    icon: String,
    start_date: String,
    end_date: String,
    duration_days: u32,
    daily_progress: Vec<DayRecordDocument>,
    current_streak: u32,
    longest_streak: u32,
    is_completed: bool,
    completed_at: Option<String>,
    created_at: String,
    updated_at: String,
}

impl From<&Habit> for HabitDocument {
    fn from(habit: &Habit) -> Self {
        HabitDocument {
            id: habit.id.clone(),
            user_id: habit.user_id.clone(),
            title: habit.title.clone(),
            description: habit.description.clone(),
            category: habit.category.clone(),
            icon: habit.icon.clone(),
            start_date: habit.start_date.format("%Y-%m-%d").to_string(),
            end_date: habit.end_date.format("%Y-%m-%d").to_string(),
            duration_days: habit.duration_days,
            daily_progress: habit
                .daily_progress
                .iter()
                .map(|record| DayRecordDocument {
                    date: record.date.format("%Y-%m-%d").to_string(),
                    completed: record.completed,
                    completed_at: record.completed_at.map(|t| t.to_rfc3339()),
                })
                .collect(),
            current_streak: habit.current_streak,
            longest_streak: habit.longest_streak,
            is_completed: habit.is_completed,
            completed_at: habit.completed_at.map(|t| t.to_rfc3339()),
            created_at: habit.created_at.to_rfc3339(),
            updated_at: habit.updated_at.to_rfc3339(),
        }
    }
}

impl TryFrom<HabitDocument> for Habit {
    type Error = anyhow::Error;

    fn try_from(document: HabitDocument) -> Result<Self> {
        let daily_progress = document
            .daily_progress
            .into_iter()
            .map(|record| {
                Ok(DayRecord {
                    date: parse_date(&record.date)?,
                    completed: record.completed,
                    completed_at: record.completed_at.map(|t| parse_utc(&t)).transpose()?,
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Habit {
            id: document.id,
            user_id: document.user_id,
            title: document.title,
            description: document.description,
            category: document.category,
            icon: document.icon,
            start_date: parse_date(&document.start_date)?,
            end_date: parse_date(&document.end_date)?,
            duration_days: document.duration_days,
            daily_progress,
            current_streak: document.current_streak,
            longest_streak: document.longest_streak,
            is_completed: document.is_completed,
            completed_at: document.completed_at.map(|t| parse_utc(&t)).transpose()?,
            created_at: parse_utc(&document.created_at)?,
            updated_at: parse_utc(&document.updated_at)?,
        })
    }
}

fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| anyhow::anyhow!("Failed to parse date '{}': {}", value, e))
}

fn parse_utc(value: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(value)
        .map_err(|e| anyhow::anyhow!("Failed to parse timestamp '{}': {}", value, e))?
        .with_timezone(&Utc))
}

#[derive(Clone)]
pub struct HabitRepository {
    connection: FsConnection,
    user_repository: UserRepository,
}

impl HabitRepository {
    pub fn new(connection: FsConnection) -> Self {
        let user_repository = UserRepository::new(connection.clone());
        Self {
            connection,
            user_repository,
        }
    }

    fn habits_path(&self, directory_name: &str) -> PathBuf {
        self.connection.user_directory(directory_name).join("habits.json")
    }

    fn user_directory(&self, user_id: &str) -> Result<String> {
        self.user_repository
            .find_user_directory(user_id)?
            .ok_or_else(|| anyhow::anyhow!("No data directory for user: {}", user_id))
    }

    fn read_habits(&self, directory_name: &str) -> Result<Vec<Habit>> {
        let path = self.habits_path(directory_name);
        if !path.exists() {
            return Ok(Vec::new());
        }

        let contents = fs::read_to_string(&path)?;
        let documents: Vec<HabitDocument> = serde_json::from_str(&contents)?;

        let mut habits = Vec::new();
        for document in documents {
            match Habit::try_from(document) {
                Ok(habit) => habits.push(habit),
                Err(e) => warn!("Failed to parse habit document: {}. Skipping.", e),
            }
        }
        Ok(habits)
    }

    fn write_habits(&self, directory_name: &str, habits: &[Habit]) -> Result<()> {
        let user_dir = self.connection.user_directory(directory_name);
        if !user_dir.exists() {
            fs::create_dir_all(&user_dir)?;
        }

        let documents: Vec<HabitDocument> = habits.iter().map(HabitDocument::from).collect();
        let json = serde_json::to_string_pretty(&documents)?;
        self.connection
            .write_atomic(&self.habits_path(directory_name), json.as_bytes())?;
        debug!(
            "Wrote {} habits to {:?}",
            habits.len(),
            self.habits_path(directory_name)
        );
        Ok(())
    }
}

impl HabitStorage for HabitRepository {
    fn store_habit(&self, habit: &Habit) -> Result<()> {
        let directory_name = self.user_directory(&habit.user_id)?;
        let mut habits = self.read_habits(&directory_name)?;
        habits.push(habit.clone());
        self.write_habits(&directory_name, &habits)
    }

    fn get_habit(&self, user_id: &str, habit_id: &str) -> Result<Option<Habit>> {
        let directory_name = self.user_directory(user_id)?;
        Ok(self
            .read_habits(&directory_name)?
            .into_iter()
            .find(|habit| habit.id == habit_id))
    }

    fn list_habits(&self, user_id: &str) -> Result<Vec<Habit>> {
        let directory_name = self.user_directory(user_id)?;
        let mut habits = self.read_habits(&directory_name)?;
        // Most recently created first
        habits.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(habits)
    }

    fn update_habit(&self, habit: &Habit) -> Result<()> {
        let directory_name = self.user_directory(&habit.user_id)?;
        let mut habits = self.read_habits(&directory_name)?;
        let slot = habits
            .iter_mut()
            .find(|existing| existing.id == habit.id)
            .ok_or_else(|| anyhow::anyhow!("Habit not found: {}", habit.id))?;
        *slot = habit.clone();
        self.write_habits(&directory_name, &habits)
    }

    fn delete_habit(&self, user_id: &str, habit_id: &str) -> Result<bool> {
        let directory_name = self.user_directory(user_id)?;
        let mut habits = self.read_habits(&directory_name)?;
        let before = habits.len();
        habits.retain(|habit| habit.id != habit_id);
        if habits.len() == before {
            return Ok(false);
        }
        self.write_habits(&directory_name, &habits)?;
        Ok(true)
    }
}
