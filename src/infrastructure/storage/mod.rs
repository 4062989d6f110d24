use crate::core::errors::FintrackError;
use crate::core::models::{
    Group, GroupInvitation, GroupMember, InvitationStatus, OwnerScope, Transaction, UserProfile, UserSettings,
};
use async_trait::async_trait;

/// Outcome of [`Storage::remove_member`].
#[derive(Debug, Clone)]
pub enum MemberRemoval {
    /// The group survives with the remaining members.
    Remaining(Group),
    /// The member was the last one; the group and its dependants are gone.
    GroupDeleted { group: Group, removed_invitations: usize },
}

#[async_trait]
pub trait Storage: Send + Sync {
    async fn list_transactions(&self, scope: &OwnerScope) -> Result<Vec<Transaction>, FintrackError>;
    async fn get_transaction(&self, scope: &OwnerScope, transaction_id: &str)
    -> Result<Option<Transaction>, FintrackError>;
    async fn insert_transaction(&self, scope: &OwnerScope, transaction: Transaction) -> Result<(), FintrackError>;
    async fn save_transaction(&self, scope: &OwnerScope, transaction: Transaction) -> Result<(), FintrackError>;
    async fn delete_transaction(&self, scope: &OwnerScope, transaction_id: &str) -> Result<bool, FintrackError>;

    async fn save_group(&self, group: Group) -> Result<(), FintrackError>;
    async fn get_group(&self, group_id: &str) -> Result<Option<Group>, FintrackError>;
    async fn get_groups_for_member(&self, user_id: &str) -> Result<Vec<Group>, FintrackError>;

    async fn save_invitation(&self, invitation: GroupInvitation) -> Result<(), FintrackError>;
    async fn get_invitation(&self, invitation_id: &str) -> Result<Option<GroupInvitation>, FintrackError>;
    async fn get_invitation_by_token(&self, token: &str) -> Result<Option<GroupInvitation>, FintrackError>;
    async fn get_invitations_for_email(
        &self,
        email: &str,
        status: Option<InvitationStatus>,
    ) -> Result<Vec<GroupInvitation>, FintrackError>;

    /// Adds `member` to the invitation's group and marks the invitation accepted as one unit.
    /// Nothing is written unless both documents exist and the invitation is still pending.
    async fn accept_invitation(&self, invitation_id: &str, member: GroupMember) -> Result<Group, FintrackError>;
    /// Removes `user_id` from the group in one step. A group left without members
    /// is removed with the same cascade as [`Storage::delete_group_cascade`].
    async fn remove_member(&self, group_id: &str, user_id: &str) -> Result<MemberRemoval, FintrackError>;
    /// Removes a group together with its transactions and pending invitations.
    /// Returns the number of invitations removed.
    async fn delete_group_cascade(&self, group_id: &str) -> Result<usize, FintrackError>;

    async fn get_profile(&self, user_id: &str) -> Result<Option<UserProfile>, FintrackError>;
    async fn save_profile(&self, user_id: &str, profile: UserProfile) -> Result<(), FintrackError>;
    async fn get_settings(&self, user_id: &str) -> Result<Option<UserSettings>, FintrackError>;
    async fn save_settings(&self, user_id: &str, settings: UserSettings) -> Result<(), FintrackError>;
}

pub mod in_memory;
