//! Axum handlers for group endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use shared::{CreateGroupRequest, GroupDto, GroupMembershipDto};
use tracing::info;

use super::{ApiError, AppState, CurrentUser};
use crate::domain::commands::group::{CreateGroupCommand, JoinGroupCommand};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_group))
        .route("/:id/join", post(join_group))
}

/// POST /api/group
pub async fn create_group(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<CreateGroupRequest>,
) -> impl IntoResponse {
    info!("POST /api/group - name: {}", request.name);

    match state.group_service.create_group(CreateGroupCommand {
        user_id: user.id,
        name: request.name,
        description: request.description,
    }) {
        Ok(result) => {
            let group = GroupDto {
                id: result.group.id,
                name: result.group.name,
                description: result.group.description,
                created_by: result.group.created_by,
            };
            (StatusCode::CREATED, Json(group)).into_response()
        }
        Err(e) => {
            tracing::error!("Error creating group: {:?}", e);
            ApiError::from(e).into_response()
        }
    }
}

/// POST /api/group/:id/join
pub async fn join_group(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(group_id): Path<String>,
) -> impl IntoResponse {
    info!("POST /api/group/{}/join", group_id);

    match state.group_service.join_group(JoinGroupCommand {
        user_id: user.id,
        group_id,
    }) {
        Ok(result) => {
            let membership = GroupMembershipDto {
                group_id: result.membership.group_id,
                user_id: result.membership.user_id,
                joined_at: result.membership.joined_at.to_rfc3339(),
            };
            (StatusCode::CREATED, Json(membership)).into_response()
        }
        Err(e) => {
            tracing::error!("Error joining group: {:?}", e);
            ApiError::from(e).into_response()
        }
    }
}
