//! Commands and results for group operations.

use crate::domain::models::group::{Group, GroupMembership};

#[derive(Debug, Clone)]
pub struct CreateGroupCommand {
    pub user_id: String,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone)]
pub struct CreateGroupResult {
    pub group: Group,
}

#[derive(Debug, Clone)]
pub struct JoinGroupCommand {
    pub user_id: String,
    pub group_id: String,
}

#[derive(Debug, Clone)]
pub struct JoinGroupResult {
    pub membership: GroupMembership,
}
