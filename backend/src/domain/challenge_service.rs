//! Challenge lifecycle: creation, joining, and per-participant progress.
//!
//! Completing a challenge is the second writer of the user gamification
//! aggregate (after the prayer reward engine): the finishing progress
//! update awards +100 xp and a title badge, once.

use chrono::{Duration, Local, NaiveDate, Utc};
use log::info;
use std::sync::Arc;

use crate::domain::commands::challenge::{
    ChallengeDetailsCommand, ChallengeDetailsResult, CreateChallengeCommand, CreateChallengeResult,
    JoinChallengeCommand, JoinChallengeResult, MyChallengesCommand, MyChallengesResult,
    UpdateProgressCommand, UpdateProgressResult,
};
use crate::domain::error::DomainError;
use crate::domain::models::challenge::{Challenge, ChallengeParticipant, ChallengeStatus};
use crate::storage::fs::{ChallengeRepository, FsConnection, UserRepository};
use crate::storage::traits::{ChallengeStorage, UserStorage};

/// XP awarded for finishing a challenge
const CHALLENGE_COMPLETION_XP: u32 = 100;

#[derive(Clone)]
pub struct ChallengeService {
    challenge_repository: ChallengeRepository,
    user_repository: UserRepository,
}

impl ChallengeService {
    pub fn new(connection: Arc<FsConnection>) -> Self {
        let challenge_repository = ChallengeRepository::new((*connection).clone());
        let user_repository = UserRepository::new((*connection).clone());
        Self {
            challenge_repository,
            user_repository,
        }
    }

    pub fn create_challenge(
        &self,
        command: CreateChallengeCommand,
    ) -> Result<CreateChallengeResult, DomainError> {
        self.create_challenge_on(command, Local::now().date_naive())
    }

    pub fn create_challenge_on(
        &self,
        command: CreateChallengeCommand,
        today: NaiveDate,
    ) -> Result<CreateChallengeResult, DomainError> {
        info!("Creating challenge: {:?}", command);

        if command.title.trim().is_empty() || command.title.len() > 100 {
            return Err(DomainError::Validation(
                "Title must be 1-100 characters".to_string(),
            ));
        }
        if command.description.trim().is_empty() || command.description.len() > 500 {
            return Err(DomainError::Validation(
                "Description must be 1-500 characters".to_string(),
            ));
        }
        if command.goal.trim().is_empty() {
            return Err(DomainError::Validation("Goal is required".to_string()));
        }
        if command.total_days < 1 {
            return Err(DomainError::Validation(
                "Total days must be a positive integer".to_string(),
            ));
        }

        let now = Utc::now();
        let challenge = Challenge {
            id: Challenge::generate_id(now.timestamp_millis() as u64),
            title: command.title.trim().to_string(),
            description: command.description,
            goal: command.goal,
            total_days: command.total_days,
            start_date: today,
            end_date: today + Duration::days(command.total_days as i64),
            is_group: command.is_group.unwrap_or(false),
            created_by: command.user_id,
            status: ChallengeStatus::Active,
            created_at: now,
        };

        self.challenge_repository.store_challenge(&challenge)?;
        info!("Created challenge: {} with ID: {}", challenge.title, challenge.id);

        Ok(CreateChallengeResult { challenge })
    }

    pub fn join_challenge(
        &self,
        command: JoinChallengeCommand,
    ) -> Result<JoinChallengeResult, DomainError> {
        info!("User {} joining challenge {}", command.user_id, command.challenge_id);

        let challenge = self
            .challenge_repository
            .get_challenge(&command.challenge_id)?
            .ok_or_else(|| DomainError::not_found("Challenge", &command.challenge_id))?;
        if challenge.status != ChallengeStatus::Active {
            return Err(DomainError::Validation("Challenge is not active".to_string()));
        }

        if self
            .challenge_repository
            .get_participant(&command.user_id, &command.challenge_id)?
            .is_some()
        {
            return Err(DomainError::Conflict(
                "User already joined this challenge".to_string(),
            ));
        }

        let participant = ChallengeParticipant {
            user_id: command.user_id,
            challenge_id: command.challenge_id,
            progress: 0,
            current_day: 1,
            completed: false,
            joined_at: Utc::now(),
        };
        self.challenge_repository.store_participant(&participant)?;

        Ok(JoinChallengeResult { participant })
    }

    /// Advance the caller's progress by one day. The update that reaches
    /// `total_days` completes the participation and pays out.
    pub fn update_progress(
        &self,
        command: UpdateProgressCommand,
    ) -> Result<UpdateProgressResult, DomainError> {
        info!(
            "Updating progress for {} in challenge {}",
            command.user_id, command.challenge_id
        );

        let mut participant = self
            .challenge_repository
            .get_participant(&command.user_id, &command.challenge_id)?
            .ok_or_else(|| {
                DomainError::NotFound("You are not part of this challenge".to_string())
            })?;

        if participant.completed {
            // Already done; nothing to advance
            return Ok(UpdateProgressResult {
                participant,
                challenge_completed: false,
            });
        }

        let challenge = match self.challenge_repository.get_challenge(&command.challenge_id)? {
            Some(challenge) if challenge.status == ChallengeStatus::Active => challenge,
            _ => {
                return Err(DomainError::NotFound(
                    "Challenge not found or not active".to_string(),
                ))
            }
        };

        participant.progress += 1;
        participant.current_day += 1;

        let challenge_completed = participant.progress >= challenge.total_days;
        if challenge_completed {
            participant.completed = true;

            let mut user = self
                .user_repository
                .get_user(&command.user_id)?
                .ok_or_else(|| DomainError::not_found("User", &command.user_id))?;
            user.xp += CHALLENGE_COMPLETION_XP;
            user.award_badge(&format!("{} Completed", challenge.title));
            user.last_activity = Some(Utc::now());
            user.updated_at = Utc::now();
            self.user_repository.update_user(&user)?;

            info!(
                "User {} completed challenge {} (+{} xp)",
                command.user_id, challenge.id, CHALLENGE_COMPLETION_XP
            );
        }

        self.challenge_repository.update_participant(&participant)?;

        Ok(UpdateProgressResult {
            participant,
            challenge_completed,
        })
    }

    pub fn my_challenges(
        &self,
        command: MyChallengesCommand,
    ) -> Result<MyChallengesResult, DomainError> {
        let participants = self
            .challenge_repository
            .list_participants_for_user(&command.user_id)?;

        let mut entries = Vec::new();
        for participant in participants {
            if let Some(challenge) = self
                .challenge_repository
                .get_challenge(&participant.challenge_id)?
            {
                entries.push((participant, challenge));
            }
        }

        Ok(MyChallengesResult { entries })
    }

    pub fn challenge_details(
        &self,
        command: ChallengeDetailsCommand,
    ) -> Result<ChallengeDetailsResult, DomainError> {
        let challenge = self
            .challenge_repository
            .get_challenge(&command.challenge_id)?
            .ok_or_else(|| DomainError::not_found("Challenge", &command.challenge_id))?;
        let participants = self
            .challenge_repository
            .list_participants_for_challenge(&command.challenge_id)?;

        Ok(ChallengeDetailsResult {
            challenge,
            participants,
        })
    }
}
