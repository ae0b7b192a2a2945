//! Habit lifecycle: creation, day-completion toggling, and automatic
//! completion detection.
//!
//! A habit moves through exactly one transition, Active → Completed, and
//! that transition is taken by the same toggle that completes the final
//! open day. Completed habits reject every further mutation.
//!
//! The stored streak fields are caches over the ledger: they are
//! overwritten with the calculator's output on every toggle, with
//! `longest_streak` kept monotone so an un-toggle never erases a record.

use chrono::{Local, NaiveDate, Utc};
use log::info;
use std::sync::Arc;

use crate::domain::commands::habit::{
    CreateHabitCommand, CreateHabitResult, DeleteHabitCommand, DeleteHabitResult, GetHabitCommand,
    GetHabitResult, ListHabitsCommand, ListHabitsResult, MarkDayCompleteCommand,
    MarkDayCompleteResult, UpdateHabitCommand, UpdateHabitResult,
};
use crate::domain::error::DomainError;
use crate::domain::ledger;
use crate::domain::models::habit::Habit;
use crate::storage::fs::{FsConnection, HabitRepository};
use crate::storage::traits::HabitStorage;

#[derive(Clone)]
pub struct HabitService {
    habit_repository: HabitRepository,
}

impl HabitService {
    pub fn new(connection: Arc<FsConnection>) -> Self {
        let habit_repository = HabitRepository::new((*connection).clone());
        Self { habit_repository }
    }

    pub fn create_habit(
        &self,
        command: CreateHabitCommand,
    ) -> Result<CreateHabitResult, DomainError> {
        self.create_habit_on(command, Local::now().date_naive())
    }

    /// Create a habit with an explicit "today" (the default start date).
    pub fn create_habit_on(
        &self,
        command: CreateHabitCommand,
        today: NaiveDate,
    ) -> Result<CreateHabitResult, DomainError> {
        info!("Creating habit: {:?}", command);

        if command.title.trim().is_empty() {
            return Err(DomainError::Validation("Habit title cannot be empty".to_string()));
        }
        if command.duration_days < 1 {
            return Err(DomainError::Validation(
                "Duration must be a positive number of days".to_string(),
            ));
        }

        let start_date = match command.start_date {
            Some(raw) => NaiveDate::parse_from_str(&raw, "%Y-%m-%d").map_err(|_| {
                DomainError::Validation(format!("Invalid start date: {}", raw))
            })?,
            None => today,
        };

        let now = Utc::now();
        let habit = Habit {
            id: Habit::generate_id(now.timestamp_millis() as u64),
            user_id: command.user_id,
            title: command.title.trim().to_string(),
            description: command.description.unwrap_or_default(),
            category: command.category.unwrap_or_default(),
            icon: command.icon.unwrap_or_default(),
            start_date,
            end_date: Habit::end_date_for(start_date, command.duration_days),
            duration_days: command.duration_days,
            daily_progress: ledger::generate(start_date, command.duration_days),
            current_streak: 0,
            longest_streak: 0,
            is_completed: false,
            completed_at: None,
            created_at: now,
            updated_at: now,
        };

        self.habit_repository.store_habit(&habit)?;
        info!("Created habit: {} with ID: {}", habit.title, habit.id);

        Ok(CreateHabitResult { habit })
    }

    pub fn list_active_habits(
        &self,
        command: ListHabitsCommand,
    ) -> Result<ListHabitsResult, DomainError> {
        let habits = self
            .habit_repository
            .list_habits(&command.user_id)?
            .into_iter()
            .filter(|habit| !habit.is_completed)
            .collect();
        Ok(ListHabitsResult { habits })
    }

    pub fn list_completed_habits(
        &self,
        command: ListHabitsCommand,
    ) -> Result<ListHabitsResult, DomainError> {
        let habits = self
            .habit_repository
            .list_habits(&command.user_id)?
            .into_iter()
            .filter(|habit| habit.is_completed)
            .collect();
        Ok(ListHabitsResult { habits })
    }

    pub fn get_habit(&self, command: GetHabitCommand) -> Result<GetHabitResult, DomainError> {
        let habit = self
            .habit_repository
            .get_habit(&command.user_id, &command.habit_id)?
            .ok_or_else(|| DomainError::not_found("Habit", &command.habit_id))?;
        Ok(GetHabitResult { habit })
    }

    /// Update cosmetic fields. The schedule and the ledger shape are fixed
    /// at creation and never change here.
    pub fn update_habit(
        &self,
        command: UpdateHabitCommand,
    ) -> Result<UpdateHabitResult, DomainError> {
        info!("Updating habit: {}", command.habit_id);

        let mut habit = self
            .habit_repository
            .get_habit(&command.user_id, &command.habit_id)?
            .ok_or_else(|| DomainError::not_found("Habit", &command.habit_id))?;

        if habit.is_completed {
            return Err(DomainError::AlreadyCompleted(
                "Completed habits cannot be edited".to_string(),
            ));
        }

        if command.title.is_none()
            && command.description.is_none()
            && command.category.is_none()
            && command.icon.is_none()
        {
            return Err(DomainError::Validation(
                "At least one field is required".to_string(),
            ));
        }

        if let Some(title) = command.title {
            if title.trim().is_empty() {
                return Err(DomainError::Validation("Habit title cannot be empty".to_string()));
            }
            habit.title = title.trim().to_string();
        }
        if let Some(description) = command.description {
            habit.description = description;
        }
        if let Some(category) = command.category {
            habit.category = category;
        }
        if let Some(icon) = command.icon {
            habit.icon = icon;
        }

        habit.updated_at = Utc::now();
        self.habit_repository.update_habit(&habit)?;

        Ok(UpdateHabitResult { habit })
    }

    pub fn delete_habit(
        &self,
        command: DeleteHabitCommand,
    ) -> Result<DeleteHabitResult, DomainError> {
        info!("Deleting habit: {}", command.habit_id);

        let deleted = self
            .habit_repository
            .delete_habit(&command.user_id, &command.habit_id)?;
        if !deleted {
            return Err(DomainError::not_found("Habit", &command.habit_id));
        }

        Ok(DeleteHabitResult {
            success_message: "Habit deleted successfully".to_string(),
        })
    }

    pub fn mark_day_complete(
        &self,
        command: MarkDayCompleteCommand,
    ) -> Result<MarkDayCompleteResult, DomainError> {
        self.mark_day_complete_on(command, Local::now().date_naive())
    }

    /// Toggle today's ledger entry and refresh the derived state.
    pub fn mark_day_complete_on(
        &self,
        command: MarkDayCompleteCommand,
        today: NaiveDate,
    ) -> Result<MarkDayCompleteResult, DomainError> {
        info!("Toggling today's progress for habit: {}", command.habit_id);

        let mut habit = self
            .habit_repository
            .get_habit(&command.user_id, &command.habit_id)?
            .ok_or_else(|| DomainError::not_found("Habit", &command.habit_id))?;

        if habit.is_completed {
            return Err(DomainError::AlreadyCompleted(
                "Habit is already completed".to_string(),
            ));
        }

        let now = Utc::now();
        ledger::toggle_today(&mut habit.daily_progress, today, now).ok_or_else(|| {
            DomainError::OutOfRange(format!(
                "Habit window {} to {} does not cover {}",
                habit.start_date, habit.end_date, today
            ))
        })?;

        let streaks = ledger::compute_streaks(&habit.daily_progress, today);
        habit.current_streak = streaks.current;
        // Longest streak never regresses, even if today is un-toggled later
        habit.longest_streak = habit.longest_streak.max(streaks.longest);

        let newly_completed = habit.all_days_completed();
        if newly_completed {
            habit.is_completed = true;
            habit.completed_at = Some(now);
            info!("Habit {} completed all {} days", habit.id, habit.duration_days);
        }

        habit.updated_at = now;
        self.habit_repository.update_habit(&habit)?;

        Ok(MarkDayCompleteResult { habit, newly_completed })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::commands::user::RegisterUserCommand;
    use crate::domain::user_service::UserService;
    use tempfile::TempDir;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn create_test_service() -> (HabitService, TempDir, String) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let connection =
            Arc::new(FsConnection::new(temp_dir.path()).expect("Failed to init test store"));

        let user_service = UserService::new(connection.clone());
        let user = user_service
            .register_user(RegisterUserCommand {
                username: "amina".to_string(),
                email: "amina@example.com".to_string(),
                full_name: "Amina".to_string(),
                avatar: None,
            })
            .expect("Failed to register test user")
            .user;

        (HabitService::new(connection), temp_dir, user.id)
    }

    fn create_command(user_id: &str, duration_days: u32, start_date: &str) -> CreateHabitCommand {
        CreateHabitCommand {
            user_id: user_id.to_string(),
            title: "Read Quran".to_string(),
            duration_days,
            start_date: Some(start_date.to_string()),
            description: Some("Ten pages a day".to_string()),
            category: None,
            icon: None,
        }
    }

    fn toggle_command(user_id: &str, habit_id: &str) -> MarkDayCompleteCommand {
        MarkDayCompleteCommand {
            user_id: user_id.to_string(),
            habit_id: habit_id.to_string(),
        }
    }

    #[test]
    fn test_create_habit_builds_full_ledger() {
        let (service, _temp_dir, user_id) = create_test_service();

        let result = service
            .create_habit_on(create_command(&user_id, 7, "2024-01-01"), date("2024-01-01"))
            .expect("Failed to create habit");

        let habit = result.habit;
        assert_eq!(habit.duration_days, 7);
        assert_eq!(habit.daily_progress.len(), 7);
        assert_eq!(habit.start_date, date("2024-01-01"));
        assert_eq!(habit.end_date, date("2024-01-07"));
        assert_eq!(habit.current_streak, 0);
        assert_eq!(habit.longest_streak, 0);
        assert!(!habit.is_completed);
    }

    #[test]
    fn test_create_habit_validation() {
        let (service, _temp_dir, user_id) = create_test_service();

        let mut command = create_command(&user_id, 7, "2024-01-01");
        command.title = "   ".to_string();
        assert!(matches!(
            service.create_habit_on(command, date("2024-01-01")),
            Err(DomainError::Validation(_))
        ));

        assert!(matches!(
            service.create_habit_on(create_command(&user_id, 0, "2024-01-01"), date("2024-01-01")),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn test_create_habit_defaults_start_to_today() {
        let (service, _temp_dir, user_id) = create_test_service();

        let mut command = create_command(&user_id, 3, "ignored");
        command.start_date = None;
        let habit = service
            .create_habit_on(command, date("2024-06-01"))
            .unwrap()
            .habit;
        assert_eq!(habit.start_date, date("2024-06-01"));
        assert_eq!(habit.end_date, date("2024-06-03"));
    }

    #[test]
    fn test_three_day_completion_scenario() {
        let (service, _temp_dir, user_id) = create_test_service();
        let habit_id = service
            .create_habit_on(create_command(&user_id, 3, "2024-01-01"), date("2024-01-01"))
            .unwrap()
            .habit
            .id;

        let day1 = service
            .mark_day_complete_on(toggle_command(&user_id, &habit_id), date("2024-01-01"))
            .expect("Day 1 toggle failed");
        assert_eq!(day1.habit.current_streak, 1);
        assert_eq!(day1.habit.longest_streak, 1);
        assert!(!day1.habit.is_completed);
        assert!(!day1.newly_completed);

        let day2 = service
            .mark_day_complete_on(toggle_command(&user_id, &habit_id), date("2024-01-02"))
            .expect("Day 2 toggle failed");
        assert_eq!(day2.habit.current_streak, 2);
        assert_eq!(day2.habit.longest_streak, 2);

        let day3 = service
            .mark_day_complete_on(toggle_command(&user_id, &habit_id), date("2024-01-03"))
            .expect("Day 3 toggle failed");
        assert_eq!(day3.habit.current_streak, 3);
        assert_eq!(day3.habit.longest_streak, 3);
        assert!(day3.habit.is_completed);
        assert!(day3.habit.completed_at.is_some());
        assert!(day3.newly_completed);

        // Terminal state: no further toggles
        let blocked =
            service.mark_day_complete_on(toggle_command(&user_id, &habit_id), date("2024-01-03"));
        assert!(matches!(blocked, Err(DomainError::AlreadyCompleted(_))));
    }

    #[test]
    fn test_toggle_outside_window_is_out_of_range() {
        let (service, _temp_dir, user_id) = create_test_service();
        let habit_id = service
            .create_habit_on(create_command(&user_id, 3, "2024-01-01"), date("2024-01-01"))
            .unwrap()
            .habit
            .id;

        let before = service.mark_day_complete_on(toggle_command(&user_id, &habit_id), date("2023-12-31"));
        assert!(matches!(before, Err(DomainError::OutOfRange(_))));

        let after = service.mark_day_complete_on(toggle_command(&user_id, &habit_id), date("2024-01-04"));
        assert!(matches!(after, Err(DomainError::OutOfRange(_))));
    }

    #[test]
    fn test_untoggle_preserves_longest_streak() {
        let (service, _temp_dir, user_id) = create_test_service();
        let habit_id = service
            .create_habit_on(create_command(&user_id, 5, "2024-01-01"), date("2024-01-01"))
            .unwrap()
            .habit
            .id;

        service
            .mark_day_complete_on(toggle_command(&user_id, &habit_id), date("2024-01-01"))
            .unwrap();
        let completed = service
            .mark_day_complete_on(toggle_command(&user_id, &habit_id), date("2024-01-02"))
            .unwrap();
        assert_eq!(completed.habit.longest_streak, 2);

        // Un-toggle day 2: current drops, longest stays
        let untoggled = service
            .mark_day_complete_on(toggle_command(&user_id, &habit_id), date("2024-01-02"))
            .unwrap();
        assert_eq!(untoggled.habit.current_streak, 0);
        assert_eq!(untoggled.habit.longest_streak, 2);
        assert!(!untoggled.habit.daily_progress[1].completed);
        assert!(untoggled.habit.daily_progress[1].completed_at.is_none());
    }

    #[test]
    fn test_update_habit_rules() {
        let (service, _temp_dir, user_id) = create_test_service();
        let habit_id = service
            .create_habit_on(create_command(&user_id, 1, "2024-01-01"), date("2024-01-01"))
            .unwrap()
            .habit
            .id;

        // No fields at all
        let empty = service.update_habit(UpdateHabitCommand {
            user_id: user_id.clone(),
            habit_id: habit_id.clone(),
            title: None,
            description: None,
            category: None,
            icon: None,
        });
        assert!(matches!(empty, Err(DomainError::Validation(_))));

        let updated = service
            .update_habit(UpdateHabitCommand {
                user_id: user_id.clone(),
                habit_id: habit_id.clone(),
                title: Some("Read more Quran".to_string()),
                description: None,
                category: Some("spiritual".to_string()),
                icon: None,
            })
            .expect("Failed to update");
        assert_eq!(updated.habit.title, "Read more Quran");
        assert_eq!(updated.habit.category, "spiritual");

        // Complete the single-day habit, then edits are rejected
        service
            .mark_day_complete_on(toggle_command(&user_id, &habit_id), date("2024-01-01"))
            .unwrap();
        let blocked = service.update_habit(UpdateHabitCommand {
            user_id: user_id.clone(),
            habit_id,
            title: Some("Too late".to_string()),
            description: None,
            category: None,
            icon: None,
        });
        assert!(matches!(blocked, Err(DomainError::AlreadyCompleted(_))));
    }

    #[test]
    fn test_history_separates_completed_habits() {
        let (service, _temp_dir, user_id) = create_test_service();
        let done_id = service
            .create_habit_on(create_command(&user_id, 1, "2024-01-01"), date("2024-01-01"))
            .unwrap()
            .habit
            .id;
        service
            .create_habit_on(create_command(&user_id, 10, "2024-01-01"), date("2024-01-01"))
            .unwrap();

        service
            .mark_day_complete_on(toggle_command(&user_id, &done_id), date("2024-01-01"))
            .unwrap();

        let active = service
            .list_active_habits(ListHabitsCommand { user_id: user_id.clone() })
            .unwrap();
        assert_eq!(active.habits.len(), 1);
        assert!(!active.habits[0].is_completed);

        let history = service
            .list_completed_habits(ListHabitsCommand { user_id: user_id.clone() })
            .unwrap();
        assert_eq!(history.habits.len(), 1);
        assert_eq!(history.habits[0].id, done_id);
    }

    #[test]
    fn test_delete_habit() {
        let (service, _temp_dir, user_id) = create_test_service();
        let habit_id = service
            .create_habit_on(create_command(&user_id, 3, "2024-01-01"), date("2024-01-01"))
            .unwrap()
            .habit
            .id;

        service
            .delete_habit(DeleteHabitCommand {
                user_id: user_id.clone(),
                habit_id: habit_id.clone(),
            })
            .expect("Failed to delete");

        let again = service.delete_habit(DeleteHabitCommand { user_id, habit_id });
        assert!(matches!(again, Err(DomainError::NotFound(_))));
    }
}
