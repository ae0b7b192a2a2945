//! Axum handlers for challenge endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, patch, post},
    Json, Router,
};
use shared::{
    ChallengeDetailResponse, ChallengeDto, ChallengeParticipantDto, CreateChallengeRequest,
    MyChallengeEntry, MyChallengesResponse,
};
use tracing::info;

use super::{ApiError, AppState, CurrentUser};
use crate::domain::commands::challenge::{
    ChallengeDetailsCommand, CreateChallengeCommand, JoinChallengeCommand, MyChallengesCommand,
    UpdateProgressCommand,
};
use crate::domain::models::challenge::{Challenge, ChallengeParticipant};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_challenge))
        .route("/mine", get(my_challenges))
        .route("/:id", get(challenge_details))
        .route("/:id/join", post(join_challenge))
        .route("/:id/progress", patch(update_progress))
}

pub(crate) fn challenge_to_dto(challenge: &Challenge) -> ChallengeDto {
    ChallengeDto {
        id: challenge.id.clone(),
        title: challenge.title.clone(),
        description: challenge.description.clone(),
        goal: challenge.goal.clone(),
        total_days: challenge.total_days,
        start_date: challenge.start_date.format("%Y-%m-%d").to_string(),
        end_date: challenge.end_date.format("%Y-%m-%d").to_string(),
        is_group: challenge.is_group,
        created_by: challenge.created_by.clone(),
        status: challenge.status.as_str().to_string(),
    }
}

pub(crate) fn participant_to_dto(participant: &ChallengeParticipant) -> ChallengeParticipantDto {
    ChallengeParticipantDto {
        user_id: participant.user_id.clone(),
        challenge_id: participant.challenge_id.clone(),
        progress: participant.progress,
        current_day: participant.current_day,
        completed: participant.completed,
        joined_at: participant.joined_at.to_rfc3339(),
    }
}

/// POST /api/challenge
pub async fn create_challenge(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(request): Json<CreateChallengeRequest>,
) -> impl IntoResponse {
    info!("POST /api/challenge - title: {}", request.title);

    let command = CreateChallengeCommand {
        user_id: user.id,
        title: request.title,
        description: request.description,
        goal: request.goal,
        total_days: request.total_days,
        is_group: request.is_group,
    };

    match state.challenge_service.create_challenge(command) {
        Ok(result) => {
            (StatusCode::CREATED, Json(challenge_to_dto(&result.challenge))).into_response()
        }
        Err(e) => {
            tracing::error!("Error creating challenge: {:?}", e);
            ApiError::from(e).into_response()
        }
    }
}

/// POST /api/challenge/:id/join
pub async fn join_challenge(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(challenge_id): Path<String>,
) -> impl IntoResponse {
    info!("POST /api/challenge/{}/join", challenge_id);

    match state.challenge_service.join_challenge(JoinChallengeCommand {
        user_id: user.id,
        challenge_id,
    }) {
        Ok(result) => {
            (StatusCode::CREATED, Json(participant_to_dto(&result.participant))).into_response()
        }
        Err(e) => {
            tracing::error!("Error joining challenge: {:?}", e);
            ApiError::from(e).into_response()
        }
    }
}

/// PATCH /api/challenge/:id/progress
pub async fn update_progress(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(challenge_id): Path<String>,
) -> impl IntoResponse {
    info!("PATCH /api/challenge/{}/progress", challenge_id);

    match state.challenge_service.update_progress(UpdateProgressCommand {
        user_id: user.id,
        challenge_id,
    }) {
        Ok(result) => {
            (StatusCode::OK, Json(participant_to_dto(&result.participant))).into_response()
        }
        Err(e) => {
            tracing::error!("Error updating progress: {:?}", e);
            ApiError::from(e).into_response()
        }
    }
}

/// GET /api/challenge/mine
pub async fn my_challenges(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> impl IntoResponse {
    info!("GET /api/challenge/mine - user: {}", user.id);

    match state
        .challenge_service
        .my_challenges(MyChallengesCommand { user_id: user.id })
    {
        Ok(result) => {
            let entries = result
                .entries
                .iter()
                .map(|(participant, challenge)| MyChallengeEntry {
                    participant: participant_to_dto(participant),
                    challenge: challenge_to_dto(challenge),
                })
                .collect();
            (StatusCode::OK, Json(MyChallengesResponse { entries })).into_response()
        }
        Err(e) => ApiError::from(e).into_response(),
    }
}

/// GET /api/challenge/:id
pub async fn challenge_details(
    State(state): State<AppState>,
    CurrentUser(_user): CurrentUser,
    Path(challenge_id): Path<String>,
) -> impl IntoResponse {
    info!("GET /api/challenge/{}", challenge_id);

    match state
        .challenge_service
        .challenge_details(ChallengeDetailsCommand { challenge_id })
    {
        Ok(result) => {
            let response = ChallengeDetailResponse {
                challenge: challenge_to_dto(&result.challenge),
                participants: result.participants.iter().map(participant_to_dto).collect(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(e) => ApiError::from(e).into_response(),
    }
}
