//! Group creation and membership.

use chrono::Utc;
use log::info;
use std::sync::Arc;

use crate::domain::commands::group::{
    CreateGroupCommand, CreateGroupResult, JoinGroupCommand, JoinGroupResult,
};
use crate::domain::error::DomainError;
use crate::domain::models::group::{Group, GroupMembership};
use crate::storage::fs::{FsConnection, GroupRepository};
use crate::storage::traits::GroupStorage;

#[derive(Clone)]
pub struct GroupService {
    group_repository: GroupRepository,
}

impl GroupService {
    pub fn new(connection: Arc<FsConnection>) -> Self {
        let group_repository = GroupRepository::new((*connection).clone());
        Self { group_repository }
    }

    /// Create a group; the creator joins immediately.
    pub fn create_group(
        &self,
        command: CreateGroupCommand,
    ) -> Result<CreateGroupResult, DomainError> {
        info!("Creating group: {:?}", command);

        if command.name.trim().is_empty() || command.name.len() > 100 {
            return Err(DomainError::Validation(
                "Group name must be 1-100 characters".to_string(),
            ));
        }
        let description = command.description.unwrap_or_default();
        if description.len() > 1000 {
            return Err(DomainError::Validation(
                "Description must be at most 1000 characters".to_string(),
            ));
        }

        let now = Utc::now();
        let group = Group {
            id: Group::generate_id(now.timestamp_millis() as u64),
            name: command.name.trim().to_string(),
            description,
            created_by: command.user_id.clone(),
            created_at: now,
        };
        self.group_repository.store_group(&group)?;

        self.group_repository.store_membership(&GroupMembership {
            group_id: group.id.clone(),
            user_id: command.user_id,
            joined_at: now,
        })?;

        info!("Created group: {} with ID: {}", group.name, group.id);
        Ok(CreateGroupResult { group })
    }

    pub fn join_group(&self, command: JoinGroupCommand) -> Result<JoinGroupResult, DomainError> {
        info!("User {} joining group {}", command.user_id, command.group_id);

        self.group_repository
            .get_group(&command.group_id)?
            .ok_or_else(|| DomainError::not_found("Group", &command.group_id))?;

        if self
            .group_repository
            .membership_exists(&command.group_id, &command.user_id)?
        {
            return Err(DomainError::Conflict("User already joined".to_string()));
        }

        let membership = GroupMembership {
            group_id: command.group_id,
            user_id: command.user_id,
            joined_at: Utc::now(),
        };
        self.group_repository.store_membership(&membership)?;

        Ok(JoinGroupResult { membership })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_service() -> (GroupService, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let connection =
            Arc::new(FsConnection::new(temp_dir.path()).expect("Failed to init test store"));
        (GroupService::new(connection), temp_dir)
    }

    #[test]
    fn test_creator_joins_automatically() {
        let (service, _temp_dir) = create_test_service();

        let group = service
            .create_group(CreateGroupCommand {
                user_id: "user::1".to_string(),
                name: "Fajr Circle".to_string(),
                description: None,
            })
            .expect("Failed to create group")
            .group;

        // The creator is already a member, so a self-join conflicts
        let rejoin = service.join_group(JoinGroupCommand {
            user_id: "user::1".to_string(),
            group_id: group.id.clone(),
        });
        assert!(matches!(rejoin, Err(DomainError::Conflict(_))));

        // A different user can join once
        service
            .join_group(JoinGroupCommand {
                user_id: "user::2".to_string(),
                group_id: group.id.clone(),
            })
            .expect("Failed to join");
        let again = service.join_group(JoinGroupCommand {
            user_id: "user::2".to_string(),
            group_id: group.id,
        });
        assert!(matches!(again, Err(DomainError::Conflict(_))));
    }

    #[test]
    fn test_join_unknown_group_is_not_found() {
        let (service, _temp_dir) = create_test_service();
        let result = service.join_group(JoinGroupCommand {
            user_id: "user::1".to_string(),
            group_id: "group::nope".to_string(),
        });
        assert!(matches!(result, Err(DomainError::NotFound(_))));
    }

    #[test]
    fn test_group_name_validation() {
        let (service, _temp_dir) = create_test_service();
        let result = service.create_group(CreateGroupCommand {
            user_id: "user::1".to_string(),
            name: "  ".to_string(),
            description: None,
        });
        assert!(matches!(result, Err(DomainError::Validation(_))));
    }
}
