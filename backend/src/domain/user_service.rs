//! User profile service: registration, lookup, and account updates.
//!
//! The user document also carries the gamification aggregate; this service
//! only initializes those fields. The prayer reward engine and challenge
//! completion are the only writers afterwards.

use chrono::Utc;
use log::{info, warn};
use std::sync::Arc;

use crate::domain::commands::user::{
    GetUserCommand, GetUserResult, RegisterUserCommand, RegisterUserResult, UpdateAccountCommand,
    UpdateAccountResult,
};
use crate::domain::error::DomainError;
use crate::domain::models::user::User;
use crate::storage::fs::{FsConnection, UserRepository};
use crate::storage::traits::UserStorage;

#[derive(Clone)]
pub struct UserService {
    user_repository: UserRepository,
}

impl UserService {
    pub fn new(connection: Arc<FsConnection>) -> Self {
        let user_repository = UserRepository::new((*connection).clone());
        Self { user_repository }
    }

    /// Register a new user with a fresh gamification aggregate
    pub fn register_user(
        &self,
        command: RegisterUserCommand,
    ) -> Result<RegisterUserResult, DomainError> {
        info!("Registering user: {}", command.username);

        let username = command.username.trim().to_lowercase();
        if username.is_empty() {
            return Err(DomainError::Validation("Username cannot be empty".to_string()));
        }
        if command.full_name.trim().is_empty() {
            return Err(DomainError::Validation("Full name cannot be empty".to_string()));
        }
        let email = validate_email(&command.email)?;

        if self.user_repository.find_user_by_email(&email)?.is_some() {
            return Err(DomainError::Conflict(format!(
                "A user with email {} already exists",
                email
            )));
        }

        let now = Utc::now();
        let user = User {
            id: User::generate_id(now.timestamp_millis() as u64),
            username,
            email,
            full_name: command.full_name.trim().to_string(),
            avatar: command.avatar,
            daily_score: 0,
            streak_count: 0,
            xp: 0,
            level: 1,
            badges: Vec::new(),
            last_reward_date: None,
            last_activity: None,
            created_at: now,
            updated_at: now,
        };

        self.user_repository.store_user(&user)?;
        info!("Registered user: {} with ID: {}", user.username, user.id);

        Ok(RegisterUserResult { user })
    }

    pub fn get_user(&self, command: GetUserCommand) -> Result<GetUserResult, DomainError> {
        let user = self
            .user_repository
            .get_user(&command.user_id)?
            .ok_or_else(|| DomainError::not_found("User", &command.user_id))?;
        Ok(GetUserResult { user })
    }

    /// Update profile details; at least one field must be given
    pub fn update_account(
        &self,
        command: UpdateAccountCommand,
    ) -> Result<UpdateAccountResult, DomainError> {
        info!("Updating account: {}", command.user_id);

        if command.full_name.is_none() && command.email.is_none() {
            return Err(DomainError::Validation(
                "At least one field is required".to_string(),
            ));
        }

        let mut user = self
            .user_repository
            .get_user(&command.user_id)?
            .ok_or_else(|| DomainError::not_found("User", &command.user_id))?;

        if let Some(full_name) = command.full_name {
            if full_name.trim().is_empty() {
                return Err(DomainError::Validation("Full name cannot be empty".to_string()));
            }
            user.full_name = full_name.trim().to_string();
        }

        if let Some(email) = command.email {
            let email = validate_email(&email)?;
            if let Some(existing) = self.user_repository.find_user_by_email(&email)? {
                if existing.id != user.id {
                    warn!("Email {} already taken by {}", email, existing.id);
                    return Err(DomainError::Conflict(format!(
                        "A user with email {} already exists",
                        email
                    )));
                }
            }
            user.email = email;
        }

        user.updated_at = Utc::now();
        self.user_repository.update_user(&user)?;

        Ok(UpdateAccountResult { user })
    }
}

fn validate_email(email: &str) -> Result<String, DomainError> {
    let email = email.trim().to_string();
    if email.is_empty() || !email.contains('@') {
        return Err(DomainError::Validation(format!("Invalid email: {}", email)));
    }
    Ok(email)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn create_test_service() -> (UserService, TempDir) {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let connection =
            Arc::new(FsConnection::new(temp_dir.path()).expect("Failed to init test store"));
        (UserService::new(connection), temp_dir)
    }

    fn register_command(username: &str, email: &str) -> RegisterUserCommand {
        RegisterUserCommand {
            username: username.to_string(),
            email: email.to_string(),
            full_name: "Test User".to_string(),
            avatar: None,
        }
    }

    #[test]
    fn test_registration_initializes_gamification_state() {
        let (service, _temp_dir) = create_test_service();

        let result = service
            .register_user(register_command("Amina", "amina@example.com"))
            .expect("Failed to register");

        assert_eq!(result.user.username, "amina");
        assert_eq!(result.user.level, 1);
        assert_eq!(result.user.xp, 0);
        assert_eq!(result.user.streak_count, 0);
        assert!(result.user.badges.is_empty());
        assert!(result.user.last_reward_date.is_none());
    }

    #[test]
    fn test_duplicate_email_rejected() {
        let (service, _temp_dir) = create_test_service();
        service
            .register_user(register_command("amina", "amina@example.com"))
            .expect("Failed to register");

        let result = service.register_user(register_command("other", "amina@example.com"));
        assert!(matches!(result, Err(DomainError::Conflict(_))));
    }

    #[test]
    fn test_invalid_input_rejected() {
        let (service, _temp_dir) = create_test_service();

        assert!(matches!(
            service.register_user(register_command("", "a@example.com")),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            service.register_user(register_command("amina", "not-an-email")),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn test_update_account_requires_a_field() {
        let (service, _temp_dir) = create_test_service();
        let user = service
            .register_user(register_command("amina", "amina@example.com"))
            .unwrap()
            .user;

        let result = service.update_account(UpdateAccountCommand {
            user_id: user.id.clone(),
            full_name: None,
            email: None,
        });
        assert!(matches!(result, Err(DomainError::Validation(_))));

        let updated = service
            .update_account(UpdateAccountCommand {
                user_id: user.id,
                full_name: Some("Amina Khan".to_string()),
                email: None,
            })
            .expect("Failed to update");
        assert_eq!(updated.user.full_name, "Amina Khan");
    }
}
