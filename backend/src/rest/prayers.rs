//! Axum handlers for prayer endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use shared::{CompletePrayerResponse, PrayerRecordDto, TodayPrayersResponse};
use tracing::info;

use super::{ApiError, AppState, CurrentUser};
use crate::domain::commands::prayer::{CompletePrayerCommand, GetTodayCommand, LogTodayCommand};
use crate::domain::models::prayer::PrayerRecord;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(log_today))
        .route("/today", get(get_today))
        .route("/:id/complete", post(complete_prayer))
}

pub(crate) fn prayer_to_dto(record: &PrayerRecord) -> PrayerRecordDto {
    PrayerRecordDto {
        id: record.id.clone(),
        user_id: record.user_id.clone(),
        prayer_name: record.prayer_name.as_str().to_string(),
        date: record.date.format("%Y-%m-%d").to_string(),
        is_completed: record.is_completed,
    }
}

/// POST /api/prayer — create today's six records, or return the existing
/// ones unchanged (201 vs 200).
pub async fn log_today(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> impl IntoResponse {
    info!("POST /api/prayer - user: {}", user.id);

    match state
        .prayer_service
        .log_today(LogTodayCommand { user_id: user.id })
    {
        Ok(result) => {
            let status = if result.created {
                StatusCode::CREATED
            } else {
                StatusCode::OK
            };
            let prayers = result.prayers.iter().map(prayer_to_dto).collect();
            (status, Json(TodayPrayersResponse { prayers })).into_response()
        }
        Err(e) => {
            tracing::error!("Error logging prayers: {:?}", e);
            ApiError::from(e).into_response()
        }
    }
}

/// GET /api/prayer/today
pub async fn get_today(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> impl IntoResponse {
    info!("GET /api/prayer/today - user: {}", user.id);

    match state
        .prayer_service
        .get_today(GetTodayCommand { user_id: user.id })
    {
        Ok(result) => {
            let prayers = result.prayers.iter().map(prayer_to_dto).collect();
            (StatusCode::OK, Json(TodayPrayersResponse { prayers })).into_response()
        }
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// POST /api/prayer/:id/complete
pub async fn complete_prayer(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(prayer_id): Path<String>,
) -> impl IntoResponse {
    info!("POST /api/prayer/{}/complete", prayer_id);

    match state.prayer_service.complete_prayer(CompletePrayerCommand {
        user_id: user.id,
        prayer_id,
    }) {
        Ok(result) => {
            let message = format!("{} marked complete", result.prayer.prayer_name.as_str());
            (
                StatusCode::OK,
                Json(CompletePrayerResponse {
                    prayer: prayer_to_dto(&result.prayer),
                    message,
                }),
            )
                .into_response()
        }
        Err(e) => {
            tracing::error!("Error completing prayer: {:?}", e);
            ApiError::from(e).into_response()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::commands::user::RegisterUserCommand;
    use crate::domain::models::user::User;
    use crate::storage::fs::FsConnection;
    use std::sync::Arc;
    use tempfile::TempDir;

    async fn setup_test_state() -> (AppState, User, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let connection =
            Arc::new(FsConnection::new(temp_dir.path()).expect("Failed to create test store"));
        let state = AppState::new(connection);

        let user = state
            .user_service
            .register_user(RegisterUserCommand {
                username: "amina".to_string(),
                email: "amina@example.com".to_string(),
                full_name: "Amina".to_string(),
                avatar: None,
            })
            .expect("Failed to register test user")
            .user;

        (state, user, temp_dir)
    }

    #[tokio::test]
    async fn test_log_today_is_created_then_ok() {
        let (state, user, _temp_dir) = setup_test_state().await;

        let first = log_today(State(state.clone()), CurrentUser(user.clone()))
            .await
            .into_response();
        assert_eq!(first.status(), StatusCode::CREATED);

        let second = log_today(State(state), CurrentUser(user)).await.into_response();
        assert_eq!(second.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_get_today_without_log_is_not_found() {
        let (state, user, _temp_dir) = setup_test_state().await;

        let response = get_today(State(state), CurrentUser(user)).await.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_complete_unknown_prayer_is_not_found() {
        let (state, user, _temp_dir) = setup_test_state().await;

        let response = complete_prayer(
            State(state),
            CurrentUser(user),
            Path("prayer::nope".to_string()),
        )
        .await
        .into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
