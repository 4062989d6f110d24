use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Member,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Role::Admin => "admin",
            Role::Member => "member",
        };
        write!(f, "{}", s)
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GroupMember {
    pub user_id: String,
    pub email: String,
    pub display_name: String,
    pub role: Role,
    pub joined_at: DateTime<Utc>,
}

impl GroupMember {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

/// A named set of members sharing one transaction collection.
///
/// Membership ids are always derived from `members`; there is no second list to keep in sync.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    pub id: String,
    pub name: String,
    pub description: String,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub members: Vec<GroupMember>,
}

impl Group {
    pub fn member_ids(&self) -> Vec<String> {
        self.members.iter().map(|m| m.user_id.clone()).collect()
    }

    pub fn is_member(&self, user_id: &str) -> bool {
        self.members.iter().any(|m| m.user_id == user_id)
    }

    pub fn member(&self, user_id: &str) -> Option<&GroupMember> {
        self.members.iter().find(|m| m.user_id == user_id)
    }

    /// Removes the member with `user_id`, returning it if it was present.
    pub fn remove_member(&mut self, user_id: &str) -> Option<GroupMember> {
        let index = self.members.iter().position(|m| m.user_id == user_id)?;
        Some(self.members.remove(index))
    }
}
