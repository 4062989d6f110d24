use crate::core::errors::FintrackError;
use crate::core::models::{
    Group, GroupInvitation, GroupMember, InvitationStatus, OwnerScope, Transaction, UserProfile, UserSettings,
};
use crate::infrastructure::storage::{MemberRemoval, Storage};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

type Collection = HashMap<String, Transaction>;

#[derive(Clone, Default)]
pub struct InMemoryStorage {
    transactions: Arc<RwLock<HashMap<OwnerScope, Collection>>>,
    groups: Arc<RwLock<HashMap<String, Group>>>,
    invitations: Arc<RwLock<HashMap<String, GroupInvitation>>>,
    invitations_by_token: Arc<RwLock<HashMap<String, String>>>,
    profiles: Arc<RwLock<HashMap<String, UserProfile>>>,
    settings: Arc<RwLock<HashMap<String, UserSettings>>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        InMemoryStorage {
            transactions: Arc::new(RwLock::new(HashMap::new())),
            groups: Arc::new(RwLock::new(HashMap::new())),
            invitations: Arc::new(RwLock::new(HashMap::new())),
            invitations_by_token: Arc::new(RwLock::new(HashMap::new())),
            profiles: Arc::new(RwLock::new(HashMap::new())),
            settings: Arc::new(RwLock::new(HashMap::new())),
        }
    }
}

fn remove_pending_invitations(
    invitations: &mut HashMap<String, GroupInvitation>,
    invitations_by_token: &mut HashMap<String, String>,
    group_id: &str,
) -> usize {
    let pending: Vec<(String, String)> = invitations
        .values()
        .filter(|i| i.group_id == group_id && i.status == InvitationStatus::Pending)
        .map(|i| (i.id.clone(), i.invite_token.clone()))
        .collect();
    for (id, token) in &pending {
        invitations.remove(id);
        invitations_by_token.remove(token);
    }
    pending.len()
}

#[async_trait]
impl Storage for InMemoryStorage {
    async fn list_transactions(&self, scope: &OwnerScope) -> Result<Vec<Transaction>, FintrackError> {
        let transactions = self.transactions.read().await;
        Ok(transactions
            .get(scope)
            .map(|c| c.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn get_transaction(
        &self,
        scope: &OwnerScope,
        transaction_id: &str,
    ) -> Result<Option<Transaction>, FintrackError> {
        let transactions = self.transactions.read().await;
        Ok(transactions.get(scope).and_then(|c| c.get(transaction_id)).cloned())
    }

    async fn insert_transaction(&self, scope: &OwnerScope, transaction: Transaction) -> Result<(), FintrackError> {
        let mut transactions = self.transactions.write().await;
        let collection = transactions.entry(scope.clone()).or_default();
        if collection.contains_key(&transaction.id) {
            return Err(FintrackError::StorageError(format!(
                "Document {}/{} already exists",
                scope, transaction.id
            )));
        }
        collection.insert(transaction.id.clone(), transaction);
        Ok(())
    }

    async fn save_transaction(&self, scope: &OwnerScope, transaction: Transaction) -> Result<(), FintrackError> {
        let mut transactions = self.transactions.write().await;
        transactions
            .entry(scope.clone())
            .or_default()
            .insert(transaction.id.clone(), transaction);
        Ok(())
    }

    async fn delete_transaction(&self, scope: &OwnerScope, transaction_id: &str) -> Result<bool, FintrackError> {
        let mut transactions = self.transactions.write().await;
        Ok(transactions
            .get_mut(scope)
            .map(|c| c.remove(transaction_id).is_some())
            .unwrap_or(false))
    }

    async fn save_group(&self, group: Group) -> Result<(), FintrackError> {
        let mut groups = self.groups.write().await;
        groups.insert(group.id.clone(), group);
        Ok(())
    }

    async fn get_group(&self, group_id: &str) -> Result<Option<Group>, FintrackError> {
        let groups = self.groups.read().await;
        Ok(groups.get(group_id).cloned())
    }

    async fn get_groups_for_member(&self, user_id: &str) -> Result<Vec<Group>, FintrackError> {
        let groups = self.groups.read().await;
        Ok(groups.values().filter(|g| g.is_member(user_id)).cloned().collect())
    }

    async fn save_invitation(&self, invitation: GroupInvitation) -> Result<(), FintrackError> {
        let mut invitations = self.invitations.write().await;
        let mut invitations_by_token = self.invitations_by_token.write().await;
        invitations_by_token.insert(invitation.invite_token.clone(), invitation.id.clone());
        invitations.insert(invitation.id.clone(), invitation);
        Ok(())
    }

    async fn get_invitation(&self, invitation_id: &str) -> Result<Option<GroupInvitation>, FintrackError> {
        let invitations = self.invitations.read().await;
        Ok(invitations.get(invitation_id).cloned())
    }

    async fn get_invitation_by_token(&self, token: &str) -> Result<Option<GroupInvitation>, FintrackError> {
        let invitations = self.invitations.read().await;
        let invitations_by_token = self.invitations_by_token.read().await;
        Ok(invitations_by_token
            .get(token)
            .and_then(|id| invitations.get(id).cloned()))
    }

    async fn get_invitations_for_email(
        &self,
        email: &str,
        status: Option<InvitationStatus>,
    ) -> Result<Vec<GroupInvitation>, FintrackError> {
        let invitations = self.invitations.read().await;
        Ok(invitations
            .values()
            .filter(|i| i.invited_email == email && status.is_none_or(|s| i.status == s))
            .cloned()
            .collect())
    }

    async fn accept_invitation(&self, invitation_id: &str, member: GroupMember) -> Result<Group, FintrackError> {
        let mut groups = self.groups.write().await;
        let mut invitations = self.invitations.write().await;

        let invitation = invitations
            .get_mut(invitation_id)
            .ok_or_else(|| FintrackError::InvitationNotFound(invitation_id.to_string()))?;
        if invitation.status != InvitationStatus::Pending {
            return Err(FintrackError::InvitationAlreadyUsed);
        }
        let group = groups
            .get_mut(&invitation.group_id)
            .ok_or_else(|| FintrackError::GroupNotFound(invitation.group_id.clone()))?;
        if group.is_member(&member.user_id) {
            return Err(FintrackError::AlreadyGroupMember(member.user_id));
        }

        group.members.push(member);
        invitation.status = InvitationStatus::Accepted;
        Ok(group.clone())
    }

    async fn remove_member(&self, group_id: &str, user_id: &str) -> Result<MemberRemoval, FintrackError> {
        let mut groups = self.groups.write().await;
        let mut transactions = self.transactions.write().await;
        let mut invitations = self.invitations.write().await;
        let mut invitations_by_token = self.invitations_by_token.write().await;

        let group = groups
            .get_mut(group_id)
            .ok_or_else(|| FintrackError::GroupNotFound(group_id.to_string()))?;
        if group.remove_member(user_id).is_none() {
            return Err(FintrackError::NotGroupMember(user_id.to_string()));
        }
        if !group.members.is_empty() {
            return Ok(MemberRemoval::Remaining(group.clone()));
        }

        let group = groups
            .remove(group_id)
            .ok_or_else(|| FintrackError::GroupNotFound(group_id.to_string()))?;
        transactions.remove(&OwnerScope::Group(group_id.to_string()));
        let removed_invitations = remove_pending_invitations(&mut invitations, &mut invitations_by_token, group_id);
        Ok(MemberRemoval::GroupDeleted {
            group,
            removed_invitations,
        })
    }

    async fn delete_group_cascade(&self, group_id: &str) -> Result<usize, FintrackError> {
        let mut groups = self.groups.write().await;
        let mut transactions = self.transactions.write().await;
        let mut invitations = self.invitations.write().await;
        let mut invitations_by_token = self.invitations_by_token.write().await;

        if groups.remove(group_id).is_none() {
            return Err(FintrackError::GroupNotFound(group_id.to_string()));
        }
        transactions.remove(&OwnerScope::Group(group_id.to_string()));
        Ok(remove_pending_invitations(&mut invitations, &mut invitations_by_token, group_id))
    }

    async fn get_profile(&self, user_id: &str) -> Result<Option<UserProfile>, FintrackError> {
        let profiles = self.profiles.read().await;
        Ok(profiles.get(user_id).cloned())
    }

    async fn save_profile(&self, user_id: &str, profile: UserProfile) -> Result<(), FintrackError> {
        let mut profiles = self.profiles.write().await;
        profiles.insert(user_id.to_string(), profile);
        Ok(())
    }

    async fn get_settings(&self, user_id: &str) -> Result<Option<UserSettings>, FintrackError> {
        let settings = self.settings.read().await;
        Ok(settings.get(user_id).cloned())
    }

    async fn save_settings(&self, user_id: &str, settings: UserSettings) -> Result<(), FintrackError> {
        let mut stored = self.settings.write().await;
        stored.insert(user_id.to_string(), settings);
        Ok(())
    }
}
