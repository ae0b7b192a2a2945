//! Commands and results for user profile operations.

use crate::domain::models::user::User;

#[derive(Debug, Clone)]
pub struct RegisterUserCommand {
    pub username: String,
    pub email: String,
    pub full_name: String,
    pub avatar: Option<String>,
}

#[derive(Debug, Clone)]
pub struct RegisterUserResult {
    pub user: User,
}

#[derive(Debug, Clone)]
pub struct GetUserCommand {
    pub user_id: String,
}

#[derive(Debug, Clone)]
pub struct GetUserResult {
    pub user: User,
}

#[derive(Debug, Clone)]
pub struct UpdateAccountCommand {
    pub user_id: String,
    pub full_name: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone)]
pub struct UpdateAccountResult {
    pub user: User,
}
