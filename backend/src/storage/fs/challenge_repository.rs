//! File-based challenge repository.
//!
//! Challenges are shared across users, so they live at the data root:
//! definitions in `challenges.json` documents, participant rows in
//! `challenge_participants.csv`.
//!
//! ## CSV Format
//!
//! ```csv
//! user_id,challenge_id,progress,current_day,completed,joined_at
//! user::1,challenge::42,3,4,false,2024-01-10T08:00:00Z
//! ```

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use csv::{Reader, Writer};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::BufReader;
use std::path::PathBuf;

use super::connection::FsConnection;
use crate::domain::models::challenge::{Challenge, ChallengeParticipant, ChallengeStatus};
use crate::storage::traits::ChallengeStorage;

/// JSON document structure for a challenge definition
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChallengeDocument {
    id: String,
    title: String,
    description: String,
    goal: String,
    total_days: u32,
    start_date: String,
    end_date: String,
    is_group: bool,
    created_by: String,
    status: String,
    created_at: String,
}

impl From<&Challenge> for ChallengeDocument {
    fn from(challenge: &Challenge) -> Self {
        ChallengeDocument {
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
            created_at: challenge.created_at.to_rfc3339(),
        }
    }
}

impl TryFrom<ChallengeDocument> for Challenge {
    type Error = anyhow::Error;

    fn try_from(document: ChallengeDocument) -> Result<Self> {
        Ok(Challenge {
            id: document.id,
            title: document.title,
            description: document.description,
            goal: document.goal,
            total_days: document.total_days,
            start_date: parse_date(&document.start_date)?,
            end_date: parse_date(&document.end_date)?,
            is_group: document.is_group,
            created_by: document.created_by,
            status: ChallengeStatus::from_string(&document.status)
                .map_err(|e| anyhow::anyhow!("Failed to parse challenge status: {}", e))?,
            created_at: parse_utc(&document.created_at)?,
        })
    }
}

/// CSV record structure for participant rows
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ParticipantCsvRecord {
    user_id: String,
    challenge_id: String,
    progress: u32,
    current_day: u32,
    completed: bool,
    joined_at: String,
}

impl From<&ChallengeParticipant> for ParticipantCsvRecord {
    fn from(participant: &ChallengeParticipant) -> Self {
        ParticipantCsvRecord {
            user_id: participant.user_id.clone(),
            challenge_id: participant.challenge_id.clone(),
            progress: participant.progress,
            current_day: participant.current_day,
            completed: participant.completed,
            joined_at: participant.joined_at.to_rfc3339(),
        }
    }
}

impl TryFrom<ParticipantCsvRecord> for ChallengeParticipant {
    type Error = anyhow::Error;

    fn try_from(record: ParticipantCsvRecord) -> Result<Self> {
        Ok(ChallengeParticipant {
            user_id: record.user_id,
            challenge_id: record.challenge_id,
            progress: record.progress,
            current_day: record.current_day,
            completed: record.completed,
            joined_at: parse_utc(&record.joined_at)?,
        })
    }
}

fn parse_date(value: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|e| anyhow::anyhow!("Failed to parse date '{}': {}", value, e))
}

fn parse_utc(value: &str) -> Result<DateTime<Utc>> {
    Ok(DateTime::parse_from_rfc3339(value)
        .map_err(|e| anyhow::anyhow!("Failed to parse timestamp '{}': {}", value, e))?
        .with_timezone(&Utc))
}

#[derive(Clone)]
pub struct ChallengeRepository {
    connection: FsConnection,
}

impl ChallengeRepository {
    pub fn new(connection: FsConnection) -> Self {
        Self { connection }
    }

    fn challenges_path(&self) -> PathBuf {
        self.connection.base_directory().join("challenges.json")
    }

    fn participants_path(&self) -> PathBuf {
        self.connection.base_directory().join("challenge_participants.csv")
    }

    fn read_challenges(&self) -> Result<Vec<Challenge>> {
        let path = self.challenges_path();
        if !path.exists() {
            return Ok(Vec::new());
        }

        let contents = std::fs::read_to_string(&path)?;
        let documents: Vec<ChallengeDocument> = serde_json::from_str(&contents)?;

        let mut challenges = Vec::new();
        for document in documents {
            match Challenge::try_from(document) {
                Ok(challenge) => challenges.push(challenge),
                Err(e) => warn!("Failed to parse challenge document: {}. Skipping.", e),
            }
        }
        Ok(challenges)
    }

    fn write_challenges(&self, challenges: &[Challenge]) -> Result<()> {
        let documents: Vec<ChallengeDocument> =
            challenges.iter().map(ChallengeDocument::from).collect();
        let json = serde_json::to_string_pretty(&documents)?;
        self.connection
            .write_atomic(&self.challenges_path(), json.as_bytes())?;
        Ok(())
    }

    fn ensure_participants_file_exists(&self) -> Result<()> {
        let path = self.participants_path();
        if !path.exists() {
            let header = "user_id,challenge_id,progress,current_day,completed,joined_at\n";
            std::fs::write(&path, header)?;
            debug!("Created participants CSV file: {:?}", path);
        }
        Ok(())
    }

    fn read_participants(&self) -> Result<Vec<ChallengeParticipant>> {
        self.ensure_participants_file_exists()?;

        let file = File::open(self.participants_path())?;
        let mut csv_reader = Reader::from_reader(BufReader::new(file));

        let mut participants = Vec::new();
        for result in csv_reader.deserialize::<ParticipantCsvRecord>() {
            let record = result?;
            match ChallengeParticipant::try_from(record) {
                Ok(participant) => participants.push(participant),
                Err(e) => warn!("Failed to parse participant record: {}. Skipping.", e),
            }
        }
        Ok(participants)
    }

    fn write_participants(&self, participants: &[ChallengeParticipant]) -> Result<()> {
        let path = self.participants_path();
        let temp_path = path.with_extension("csv.tmp");

        {
            let mut csv_writer = Writer::from_writer(File::create(&temp_path)?);
            for participant in participants {
                csv_writer.serialize(ParticipantCsvRecord::from(participant))?;
            }
            csv_writer.flush()?;
        }

        std::fs::rename(&temp_path, &path)?;
        Ok(())
    }
}

impl ChallengeStorage for ChallengeRepository {
    fn store_challenge(&self, challenge: &Challenge) -> Result<()> {
        let mut challenges = self.read_challenges()?;
        challenges.push(challenge.clone());
        self.write_challenges(&challenges)
    }

    fn get_challenge(&self, challenge_id: &str) -> Result<Option<Challenge>> {
        Ok(self
            .read_challenges()?
            .into_iter()
            .find(|challenge| challenge.id == challenge_id))
    }

    fn update_challenge(&self, challenge: &Challenge) -> Result<()> {
        let mut challenges = self.read_challenges()?;
        let slot = challenges
            .iter_mut()
            .find(|existing| existing.id == challenge.id)
            .ok_or_else(|| anyhow::anyhow!("Challenge not found: {}", challenge.id))?;
        *slot = challenge.clone();
        self.write_challenges(&challenges)
    }

    fn store_participant(&self, participant: &ChallengeParticipant) -> Result<()> {
        self.ensure_participants_file_exists()?;

        let file = OpenOptions::new().append(true).open(self.participants_path())?;
        let mut csv_writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        csv_writer.serialize(ParticipantCsvRecord::from(participant))?;
        csv_writer.flush()?;
        Ok(())
    }

    fn get_participant(
        &self,
        user_id: &str,
        challenge_id: &str,
    ) -> Result<Option<ChallengeParticipant>> {
        Ok(self.read_participants()?.into_iter().find(|participant| {
            participant.user_id == user_id && participant.challenge_id == challenge_id
        }))
    }

    fn list_participants_for_user(&self, user_id: &str) -> Result<Vec<ChallengeParticipant>> {
        Ok(self
            .read_participants()?
            .into_iter()
            .filter(|participant| participant.user_id == user_id)
            .collect())
    }

    fn list_participants_for_challenge(
        &self,
        challenge_id: &str,
    ) -> Result<Vec<ChallengeParticipant>> {
        Ok(self
            .read_participants()?
            .into_iter()
            .filter(|participant| participant.challenge_id == challenge_id)
            .collect())
    }

    fn update_participant(&self, participant: &ChallengeParticipant) -> Result<()> {
        let mut participants = self.read_participants()?;
        let slot = participants
            .iter_mut()
            .find(|existing| {
                existing.user_id == participant.user_id
                    && existing.challenge_id == participant.challenge_id
            })
            .ok_or_else(|| {
                anyhow::anyhow!(
                    "Participant not found: {} in {}",
                    participant.user_id,
                    participant.challenge_id
                )
            })?;
        *slot = participant.clone();
        self.write_participants(&participants)
    }
}
