//! Axum handlers for habit endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use shared::{
    CreateHabitRequest, DeleteHabitResponse, HabitDto, HabitListResponse,
    MarkDayCompleteResponse, UpdateHabitRequest,
};
use tracing::info;

use super::{ApiError, AppState, CurrentUser};
use crate::domain::commands::habit::{
    CreateHabitCommand, DeleteHabitCommand, GetHabitCommand, ListHabitsCommand,
    MarkDayCompleteCommand, UpdateHabitCommand,
};
use crate::domain::models::habit::Habit;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_habit).get(list_active_habits))
        .route("/history", get(list_completed_habits))
        .route("/:id", get(get_habit).put(update_habit).delete(delete_habit))
        .route("/:id/day/complete", post(mark_day_complete))
}

pub(crate) fn habit_to_dto(habit: &Habit) -> HabitDto {
    HabitDto {
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
            .map(|record| shared::DayRecordDto {
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

/// POST /api/habit
pub async fn create_habit(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<CreateHabitRequest>,
) -> impl IntoResponse {
    info!("POST /api/habit - title: {}", request.title);

    let command = CreateHabitCommand {
        user_id: user.id,
        title: request.title,
        duration_days: request.duration_days,
        start_date: request.start_date,
        description: request.description,
        category: request.category,
        icon: request.icon,
    };

    match state.habit_service.create_habit(command) {
        Ok(result) => (StatusCode::CREATED, Json(habit_to_dto(&result.habit))).into_response(),
        Err(e) => {
            tracing::error!("Error creating habit: {:?}", e);
            ApiError::from(e).into_response()
        }
    }
}

/// GET /api/habit
pub async fn list_active_habits(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> impl IntoResponse {
    info!("GET /api/habit - user: {}", user.id);

    match state
        .habit_service
        .list_active_habits(ListHabitsCommand { user_id: user.id })
    {
        Ok(result) => {
            let habits = result.habits.iter().map(habit_to_dto).collect();
            (StatusCode::OK, Json(HabitListResponse { habits })).into_response()
        }
        Err(e) => {
            tracing::error!("Error listing habits: {:?}", e);
            ApiError::from(e).into_response()
        }
    }
}

/// GET /api/habit/history
pub async fn list_completed_habits(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> impl IntoResponse {
    info!("GET /api/habit/history - user: {}", user.id);

    match state
        .habit_service
        .list_completed_habits(ListHabitsCommand { user_id: user.id })
    {
        Ok(result) => {
            let habits = result.habits.iter().map(habit_to_dto).collect();
            (StatusCode::OK, Json(HabitListResponse { habits })).into_response()
        }
        Err(e) => {
            tracing::error!("Error listing habit history: {:?}", e);
            ApiError::from(e).into_response()
        }
    }
}

/// GET /api/habit/:id
pub async fn get_habit(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(habit_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/habit/{}", habit_id);

    match state.habit_service.get_habit(GetHabitCommand {
        user_id: user.id,
        habit_id,
    }) {
        Ok(result) => (StatusCode::OK, Json(habit_to_dto(&result.habit))).into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// PUT /api/habit/:id
pub async fn update_habit(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(habit_id): Path<String>,
    Json(request): Json<UpdateHabitRequest>,
) -> impl IntoResponse {
    info!("PUT /api/habit/{}", habit_id);

    let command = UpdateHabitCommand {
        user_id: user.id,
        habit_id,
        title: request.title,
        description: request.description,
        category: request.category,
        icon: request.icon,
    };

    match state.habit_service.update_habit(command) {
        Ok(result) => (StatusCode::OK, Json(habit_to_dto(&result.habit))).into_response(),
        Err(e) => {
            tracing::error!("Error updating habit: {:?}", e);
            ApiError::from(e).into_response()
        }
    }
}

/// DELETE /api/habit/:id
pub async fn delete_habit(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(habit_id): Path<String>,
) -> impl IntoResponse {
    info!("DELETE /api/habit/{}", habit_id);

    match state.habit_service.delete_habit(DeleteHabitCommand {
        user_id: user.id,
        habit_id,
    }) {
        Ok(result) => (
            StatusCode::OK,
            Json(DeleteHabitResponse {
                message: result.success_message,
            }),
        )
            .into_response(),
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// POST /api/habit/:id/day/complete
pub async fn mark_day_complete(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(habit_id): Path<String>,
) -> impl IntoResponse {
    info!("POST /api/habit/{}/day/complete", habit_id);

    match state.habit_service.mark_day_complete(MarkDayCompleteCommand {
        user_id: user.id,
        habit_id,
    }) {
        Ok(result) => (
            StatusCode::OK,
            Json(MarkDayCompleteResponse {
                habit: habit_to_dto(&result.habit),
                newly_completed: result.newly_completed,
            }),
        )
            .into_response(),
        Err(e) => {
            tracing::error!("Error toggling today's progress: {:?}", e);
            ApiError::from(e).into_response()
        }
    }
}
