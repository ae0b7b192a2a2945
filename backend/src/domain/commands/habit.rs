//! Commands and results for habit operations.

use crate::domain::models::habit::Habit;

#[derive(Debug, Clone)]
pub struct CreateHabitCommand {
    pub user_id: String,
    pub title: String,
    pub duration_days: u32,
    /// YYYY-MM-DD; defaults to today when omitted
    pub start_date: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub icon: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CreateHabitResult {
    pub habit: Habit,
}

#[derive(Debug, Clone)]
pub struct ListHabitsCommand {
    pub user_id: String,
}

#[derive(Debug, Clone)]
pub struct ListHabitsResult {
    pub habits: Vec<Habit>,
}

#[derive(Debug, Clone)]
pub struct GetHabitCommand {
    pub user_id: String,
    pub habit_id: String,
}

#[derive(Debug, Clone)]
pub struct GetHabitResult {
    pub habit: Habit,
}

#[derive(Debug, Clone)]
pub struct UpdateHabitCommand {
    pub user_id: String,
    pub habit_id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub icon: Option<String>,
}

#[derive(Debug, Clone)]
pub struct UpdateHabitResult {
    pub habit: Habit,
}

#[derive(Debug, Clone)]
pub struct DeleteHabitCommand {
    pub user_id: String,
    pub habit_id: String,
}

#[derive(Debug, Clone)]
pub struct DeleteHabitResult {
    pub success_message: String,
}

#[derive(Debug, Clone)]
pub struct MarkDayCompleteCommand {
    pub user_id: String,
    pub habit_id: String,
}

#[derive(Debug, Clone)]
pub struct MarkDayCompleteResult {
    pub habit: Habit,
    /// True only on the toggle that completed the final open day
    pub newly_completed: bool,
}
