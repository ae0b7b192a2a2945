//! File-based group repository: group documents in `groups.json` at the
//! data root, membership rows in `group_members.csv`.

use anyhow::Result;
use chrono::{DateTime, Utc};
use csv::Reader;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::BufReader;
use std::path::PathBuf;

use super::connection::FsConnection;
use crate::domain::models::group::{Group, GroupMembership};
use crate::storage::traits::GroupStorage;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct GroupDocument {
    id: String,
    name: String,
    description: String,
    created_by: String,
    created_at: String,
}

impl From<&Group> for GroupDocument {
    fn from(group: &Group) -> Self {
        GroupDocument {
            id: group.id.clone(),
            name: group.name.clone(),
            description: group.description.clone(),
            created_by: group.created_by.clone(),
            created_at: group.created_at.to_rfc3339(),
        }
    }
}

impl TryFrom<GroupDocument> for Group {
    type Error = anyhow::Error;

    fn try_from(document: GroupDocument) -> Result<Self> {
        Ok(Group {
            id: document.id,
            name: document.name,
            description: document.description,
            created_by: document.created_by,
            created_at: DateTime::parse_from_rfc3339(&document.created_at)
                .map_err(|e| anyhow::anyhow!("Failed to parse created_at: {}", e))?
                .with_timezone(&Utc),
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct MembershipCsvRecord {
    group_id: String,
    user_id: String,
    joined_at: String,
}

#[derive(Clone)]
pub struct GroupRepository {
    connection: FsConnection,
}

impl GroupRepository {
    pub fn new(connection: FsConnection) -> Self {
        Self { connection }
    }

    fn groups_path(&self) -> PathBuf {
        self.connection.base_directory().join("groups.json")
    }

    fn members_path(&self) -> PathBuf {
        self.connection.base_directory().join("group_members.csv")
    }

    fn read_groups(&self) -> Result<Vec<Group>> {
        let path = self.groups_path();
        if !path.exists() {
            return Ok(Vec::new());
        }

        let contents = std::fs::read_to_string(&path)?;
        let documents: Vec<GroupDocument> = serde_json::from_str(&contents)?;

        let mut groups = Vec::new();
        for document in documents {
            match Group::try_from(document) {
                Ok(group) => groups.push(group),
                Err(e) => warn!("Failed to parse group document: {}. Skipping.", e),
            }
        }
        Ok(groups)
    }

    fn ensure_members_file_exists(&self) -> Result<()> {
        let path = self.members_path();
        if !path.exists() {
            let header = "group_id,user_id,joined_at\n";
            std::fs::write(&path, header)?;
            debug!("Created group members CSV file: {:?}", path);
        }
        Ok(())
    }

    fn read_memberships(&self) -> Result<Vec<GroupMembership>> {
        self.ensure_members_file_exists()?;

        let file = File::open(self.members_path())?;
        let mut csv_reader = Reader::from_reader(BufReader::new(file));

        let mut memberships = Vec::new();
        for result in csv_reader.deserialize::<MembershipCsvRecord>() {
            let record = result?;
            match DateTime::parse_from_rfc3339(&record.joined_at) {
                Ok(joined_at) => memberships.push(GroupMembership {
                    group_id: record.group_id,
                    user_id: record.user_id,
                    joined_at: joined_at.with_timezone(&Utc),
                }),
                Err(e) => warn!("Failed to parse membership record: {}. Skipping.", e),
            }
        }
        Ok(memberships)
    }
}

impl GroupStorage for GroupRepository {
    fn store_group(&self, group: &Group) -> Result<()> {
        let mut groups = self.read_groups()?;
        groups.push(group.clone());

        let documents: Vec<GroupDocument> = groups.iter().map(GroupDocument::from).collect();
        let json = serde_json::to_string_pretty(&documents)?;
        self.connection.write_atomic(&self.groups_path(), json.as_bytes())
    }

    fn get_group(&self, group_id: &str) -> Result<Option<Group>> {
        Ok(self.read_groups()?.into_iter().find(|group| group.id == group_id))
    }

    fn store_membership(&self, membership: &GroupMembership) -> Result<()> {
        self.ensure_members_file_exists()?;

        let file = OpenOptions::new().append(true).open(self.members_path())?;
        let mut csv_writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        csv_writer.serialize(MembershipCsvRecord {
            group_id: membership.group_id.clone(),
            user_id: membership.user_id.clone(),
            joined_at: membership.joined_at.to_rfc3339(),
        })?;
        csv_writer.flush()?;
        Ok(())
    }

    fn membership_exists(&self, group_id: &str, user_id: &str) -> Result<bool> {
        Ok(self
            .read_memberships()?
            .iter()
            .any(|membership| membership.group_id == group_id && membership.user_id == user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn setup() -> (GroupRepository, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let connection = FsConnection::new(temp_dir.path()).expect("Failed to create connection");
        (GroupRepository::new(connection), temp_dir)
    }

    #[test]
    fn test_group_and_membership_round_trip() {
        let (repo, _temp_dir) = setup();
        let group = Group {
            id: "group::1".to_string(),
            name: "Fajr Circle".to_string(),
            description: String::new(),
            created_by: "user::1".to_string(),
            created_at: Utc::now(),
        };

        repo.store_group(&group).expect("Failed to store group");
        assert_eq!(repo.get_group("group::1").unwrap().unwrap(), group);

        repo.store_membership(&GroupMembership {
            group_id: "group::1".to_string(),
            user_id: "user::1".to_string(),
            joined_at: Utc::now(),
        })
        .expect("Failed to store membership");

        assert!(repo.membership_exists("group::1", "user::1").unwrap());
        assert!(!repo.membership_exists("group::1", "user::2").unwrap());
    }
}
