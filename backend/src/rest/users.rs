//! Axum handlers for user profile endpoints.

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use shared::{RegisterUserRequest, UpdateAccountRequest, UserDto};
use tracing::info;

use super::{ApiError, AppState, CurrentUser};
use crate::domain::commands::user::{RegisterUserCommand, UpdateAccountCommand};
use crate::domain::models::user::User;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(register_user))
        .route("/me", get(get_me))
        .route("/update-account", post(update_account))
}

pub(crate) fn user_to_dto(user: &User) -> UserDto {
    UserDto {
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
    }
}

/// POST /api/user/register — the only route without an identity header
pub async fn register_user(
    State(state): State<AppState>,
    Json(request): Json<RegisterUserRequest>,
) -> impl IntoResponse {
    info!("POST /api/user/register - username: {}", request.username);

    let command = RegisterUserCommand {
        username: request.username,
        email: request.email,
        full_name: request.full_name,
        avatar: request.avatar,
    };

    match state.user_service.register_user(command) {
        Ok(result) => (StatusCode::CREATED, Json(user_to_dto(&result.user))).into_response(),
        Err(e) => {
            tracing::error!("Error registering user: {:?}", e);
            ApiError::from(e).into_response()
        }
    }
}

/// GET /api/user/me
pub async fn get_me(CurrentUser(user): CurrentUser) -> impl IntoResponse {
    info!("GET /api/user/me - user: {}", user.id);
    (StatusCode::OK, Json(user_to_dto(&user))).into_response()
}

/// POST /api/user/update-account
pub async fn update_account(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<UpdateAccountRequest>,
) -> impl IntoResponse {
    info!("POST /api/user/update-account - user: {}", user.id);

    let command = UpdateAccountCommand {
        user_id: user.id,
        full_name: request.full_name,
        email: request.email,
    };

    match state.user_service.update_account(command) {
        Ok(result) => (StatusCode::OK, Json(user_to_dto(&result.user))).into_response(),
        Err(e) => {
            tracing::error!("Error updating account: {:?}", e);
            ApiError::from(e).into_response()
        }
    }
}
