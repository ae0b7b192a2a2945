//! Commands and results for challenge operations.

use crate::domain::models::challenge::{Challenge, ChallengeParticipant};

#[derive(Debug, Clone)]
pub struct CreateChallengeCommand {
    pub user_id: String,
    pub title: String,
    pub description: String,
    pub goal: String,
    pub total_days: u32,
    pub is_group: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct CreateChallengeResult {
    pub challenge: Challenge,
}

#[derive(Debug, Clone)]
pub struct JoinChallengeCommand {
    pub user_id: String,
    pub challenge_id: String,
}

#[derive(Debug, Clone)]
pub struct JoinChallengeResult {
    pub participant: ChallengeParticipant,
}

#[derive(Debug, Clone)]
pub struct UpdateProgressCommand {
    pub user_id: String,
    pub challenge_id: String,
}

#[derive(Debug, Clone)]
pub struct UpdateProgressResult {
    pub participant: ChallengeParticipant,
    /// True on the progress update that finished the challenge
    pub challenge_completed: bool,
}

#[derive(Debug, Clone)]
pub struct MyChallengesCommand {
    pub user_id: String,
}

#[derive(Debug, Clone)]
pub struct MyChallengesResult {
    pub entries: Vec<(ChallengeParticipant, Challenge)>,
}

#[derive(Debug, Clone)]
pub struct ChallengeDetailsCommand {
    pub challenge_id: String,
}

#[derive(Debug, Clone)]
pub struct ChallengeDetailsResult {
    pub challenge: Challenge,
    pub participants: Vec<ChallengeParticipant>,
}
