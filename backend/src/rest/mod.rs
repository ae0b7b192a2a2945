//! REST boundary: application state, error mapping, the current-user
//! extractor, and the API router.
//!
//! Handlers are thin: they translate DTOs to commands, call a domain
//! service, and map the result (or the domain error taxonomy) back to an
//! HTTP response.

pub mod challenges;
pub mod groups;
pub mod habits;
pub mod prayers;
pub mod users;

use async_trait::async_trait;
use axum::{
    extract::FromRequestParts,
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json, Router,
};
use std::sync::Arc;

use crate::domain::commands::user::GetUserCommand;
use crate::domain::error::DomainError;
use crate::domain::models::user::User;
use crate::domain::{
    ChallengeService, GroupService, HabitService, PrayerService, UserService,
};
use crate::storage::fs::FsConnection;

/// Application state shared across handlers: one instance of every domain
/// service, all backed by the same file store connection.
#[derive(Clone)]
pub struct AppState {
    pub user_service: UserService,
    pub habit_service: HabitService,
    pub prayer_service: PrayerService,
    pub challenge_service: ChallengeService,
    pub group_service: GroupService,
}

impl AppState {
    pub fn new(connection: Arc<FsConnection>) -> Self {
        Self {
            user_service: UserService::new(connection.clone()),
            habit_service: HabitService::new(connection.clone()),
            prayer_service: PrayerService::new(connection.clone()),
            challenge_service: ChallengeService::new(connection.clone()),
            group_service: GroupService::new(connection),
        }
    }
}

/// All API routes, to be nested under `/api`
pub fn api_router() -> Router<AppState> {
    Router::new()
        .nest("/user", users::routes())
        .nest("/habit", habits::routes())
        .nest("/prayer", prayers::routes())
        .nest("/challenge", challenges::routes())
        .nest("/group", groups::routes())
}

/// API error with HTTP status code, error code, and human-readable message.
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl ApiError {
    pub fn unauthorized(message: &str) -> Self {
        ApiError {
            status: StatusCode::UNAUTHORIZED,
            code: "UNAUTHORIZED",
            message: message.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({
            "error": {
                "message": self.message,
                "code": self.code,
                "status": self.status.as_u16(),
            }
        });
        (self.status, Json(body)).into_response()
    }
}

impl From<DomainError> for ApiError {
    fn from(error: DomainError) -> Self {
        let (status, code) = match &error {
            DomainError::Validation(_) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            DomainError::NotFound(_) => (StatusCode::NOT_FOUND, "NOT_FOUND"),
            DomainError::OutOfRange(_) => (StatusCode::BAD_REQUEST, "OUT_OF_RANGE"),
            DomainError::AlreadyCompleted(_) => (StatusCode::BAD_REQUEST, "ALREADY_COMPLETED"),
            DomainError::Conflict(_) => (StatusCode::CONFLICT, "CONFLICT"),
            DomainError::Storage(e) => {
                tracing::error!("Storage error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_SERVER_ERROR")
            }
        };
        ApiError {
            status,
            code,
            message: error.to_string(),
        }
    }
}

/// The authenticated caller, resolved from the `x-user-id` header.
///
/// Token verification itself lives outside this service; by the time a
/// request arrives here the identity header is assumed to have been
/// established by that boundary. Requests without a resolvable identity
/// are rejected with 401.
pub struct CurrentUser(pub User);

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get("x-user-id")
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| ApiError::unauthorized("Missing x-user-id header"))?;

        match state.user_service.get_user(GetUserCommand {
            user_id: user_id.to_string(),
        }) {
            Ok(result) => Ok(CurrentUser(result.user)),
            Err(DomainError::NotFound(_)) => Err(ApiError::unauthorized("Unknown user")),
            Err(error) => Err(ApiError::from(error)),
        }
    }
}
