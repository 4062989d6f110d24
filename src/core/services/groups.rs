use chrono::{Duration, Utc};
use serde::Serialize;
use serde_json::json;
use tracing::{info, warn};
use utoipa::ToSchema;
use uuid::Uuid;

use super::FintrackService;
use crate::core::constants::{
    GROUP_CREATED, GROUP_DELETED, INVITATION_ACCEPTED, INVITATION_CREATED, INVITATION_REJECTED, INVITATION_TTL_DAYS,
    MEMBER_LEFT,
};
use crate::core::errors::FintrackError;
use crate::core::models::{AuthUser, Group, GroupInvitation, GroupMember, InvitationStatus, Role};
use crate::core::token::{generate_invite_token, invite_link};
use crate::core::validation::{validate_email, validate_group_description, validate_group_name};
use crate::infrastructure::classifier::Classifier;
use crate::infrastructure::logging::LoggingService;
use crate::infrastructure::storage::{MemberRemoval, Storage};

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatedInvitation {
    pub invitation: GroupInvitation,
    pub link: String,
}

/// Invitation as seen from the invite page, with its validity verdict.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InvitationLookup {
    pub invitation: GroupInvitation,
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl<L: LoggingService, S: Storage, C: Classifier> FintrackService<L, S, C> {
    pub async fn create_group(&self, user: &AuthUser, name: &str, description: &str) -> Result<Group, FintrackError> {
        let name = validate_group_name(name)?;
        let description = validate_group_description(description)?;
        let now = Utc::now();

        let group = Group {
            id: Uuid::new_v4().to_string(),
            name,
            description,
            created_by: user.id.clone(),
            created_at: now,
            members: vec![GroupMember {
                user_id: user.id.clone(),
                email: user.email.clone(),
                display_name: user.name_or_fallback(),
                role: Role::Admin,
                joined_at: now,
            }],
        };
        self.storage.save_group(group.clone()).await?;
        info!("Group {} created by {}", group.id, user.id);

        self.log_and_audit(
            Some(&group.id),
            GROUP_CREATED,
            json!({ "group_id": group.id, "name": group.name, "member_ids": group.member_ids() }),
            Some(&user.id),
        )
        .await?;

        Ok(group)
    }

    pub async fn get_group(&self, user: &AuthUser, group_id: &str) -> Result<Group, FintrackError> {
        self.validate_group_membership(group_id, &user.id).await
    }

    /// Groups the user belongs to, newest first.
    pub async fn list_groups(&self, user: &AuthUser) -> Result<Vec<Group>, FintrackError> {
        let mut groups = self.storage.get_groups_for_member(&user.id).await?;
        groups.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(groups)
    }

    /// Issues a 7-day invitation to `invited_email` and returns it with its shareable link.
    pub async fn create_invitation(
        &self,
        user: &AuthUser,
        group_id: &str,
        invited_email: &str,
    ) -> Result<CreatedInvitation, FintrackError> {
        let group = self.validate_group_membership(group_id, &user.id).await?;
        let invited_email = validate_email(invited_email)?;
        let now = Utc::now();

        let invitation = GroupInvitation {
            id: Uuid::new_v4().to_string(),
            group_id: group.id.clone(),
            group_name: group.name.clone(),
            invited_by: user.id.clone(),
            invited_by_name: user.name_or_fallback(),
            invited_email,
            status: InvitationStatus::Pending,
            created_at: now,
            expires_at: now + Duration::days(INVITATION_TTL_DAYS),
            invite_token: generate_invite_token(),
        };
        self.storage.save_invitation(invitation.clone()).await?;
        info!("Invitation {} to group {} created by {}", invitation.id, group.id, user.id);

        self.log_and_audit(
            Some(&group.id),
            INVITATION_CREATED,
            json!({
                "invitation_id": invitation.id,
                "group_id": group.id,
                "invited_email": invitation.invited_email,
                "expires_at": invitation.expires_at,
            }),
            Some(&user.id),
        )
        .await?;

        let link = invite_link(&self.public_origin, &invitation.invite_token);
        Ok(CreatedInvitation { invitation, link })
    }

    pub async fn get_invitation_by_token(&self, token: &str) -> Result<InvitationLookup, FintrackError> {
        let invitation = self
            .storage
            .get_invitation_by_token(token)
            .await?
            .ok_or_else(|| FintrackError::InvitationNotFound(token.to_string()))?;
        let now = Utc::now();
        Ok(InvitationLookup {
            valid: invitation.is_valid_at(now),
            reason: invitation.invalid_reason_at(now).map(String::from),
            invitation,
        })
    }

    /// Invitations addressed to the user's email that can still be answered.
    pub async fn list_pending_invitations(&self, user: &AuthUser) -> Result<Vec<GroupInvitation>, FintrackError> {
        let now = Utc::now();
        let mut invitations: Vec<GroupInvitation> = self
            .storage
            .get_invitations_for_email(&user.email, Some(InvitationStatus::Pending))
            .await?
            .into_iter()
            .filter(|i| i.effective_status(now) == InvitationStatus::Pending)
            .collect();
        invitations.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(invitations)
    }

    /// Loads an invitation and checks it can be answered by `user`.
    async fn answerable_invitation(
        &self,
        user: &AuthUser,
        invitation_id: &str,
    ) -> Result<GroupInvitation, FintrackError> {
        let invitation = self
            .storage
            .get_invitation(invitation_id)
            .await?
            .ok_or_else(|| FintrackError::InvitationNotFound(invitation_id.to_string()))?;

        let now = Utc::now();
        if invitation.is_expired_at(now) {
            return Err(FintrackError::InvitationExpired);
        }
        if invitation.status != InvitationStatus::Pending {
            return Err(FintrackError::InvitationAlreadyUsed);
        }
        if user.email != invitation.invited_email {
            warn!(
                "User {} tried to answer invitation {} addressed to another email",
                user.id, invitation.id
            );
            return Err(FintrackError::InvitationEmailMismatch);
        }
        Ok(invitation)
    }

    /// Joins the invited group. Membership and invitation status change together.
    pub async fn accept_invitation(&self, user: &AuthUser, invitation_id: &str) -> Result<Group, FintrackError> {
        let invitation = self.answerable_invitation(user, invitation_id).await?;

        let member = GroupMember {
            user_id: user.id.clone(),
            email: user.email.clone(),
            display_name: user.name_or_fallback(),
            role: Role::Member,
            joined_at: Utc::now(),
        };
        let group = self.storage.accept_invitation(&invitation.id, member).await?;
        info!("User {} joined group {} via invitation {}", user.id, group.id, invitation.id);

        self.log_and_audit(
            Some(&group.id),
            INVITATION_ACCEPTED,
            json!({ "invitation_id": invitation.id, "group_id": group.id, "user_id": user.id }),
            Some(&user.id),
        )
        .await?;

        Ok(group)
    }

    pub async fn reject_invitation(&self, user: &AuthUser, invitation_id: &str) -> Result<(), FintrackError> {
        let mut invitation = self.answerable_invitation(user, invitation_id).await?;
        invitation.status = InvitationStatus::Rejected;
        self.storage.save_invitation(invitation.clone()).await?;
        info!("User {} rejected invitation {}", user.id, invitation.id);

        self.log_and_audit(
            Some(&invitation.group_id),
            INVITATION_REJECTED,
            json!({ "invitation_id": invitation.id, "group_id": invitation.group_id }),
            Some(&user.id),
        )
        .await
    }

    /// Removes the user from the group. Returns `true` when the group was
    /// left empty and therefore deleted.
    pub async fn leave_group(&self, user: &AuthUser, group_id: &str) -> Result<bool, FintrackError> {
        self.validate_group_membership(group_id, &user.id).await?;

        match self.storage.remove_member(group_id, &user.id).await? {
            MemberRemoval::Remaining(group) => {
                info!("User {} left group {}", user.id, group_id);
                let details = json!({ "group_id": group_id, "user_id": user.id, "remaining_members": group.members.len() });
                self.log_and_audit(Some(group_id), MEMBER_LEFT, details, Some(&user.id)).await?;
                Ok(false)
            }
            MemberRemoval::GroupDeleted {
                group,
                removed_invitations,
            } => {
                info!("Group {} deleted after its last member left", group_id);
                let details = json!({ "group_id": group_id, "user_id": user.id, "remaining_members": 0 });
                self.log_and_audit(Some(group_id), MEMBER_LEFT, details, Some(&user.id)).await?;
                self.log_and_audit(
                    Some(group_id),
                    GROUP_DELETED,
                    json!({ "group_id": group_id, "name": group.name, "removed_invitations": removed_invitations }),
                    Some(&user.id),
                )
                .await?;
                Ok(true)
            }
        }
    }

    /// Deletes a group on behalf of its creator, cascading to its transactions
    /// and pending invitations. Returns the number of invitations removed.
    pub async fn delete_group(&self, user: &AuthUser, group_id: &str) -> Result<usize, FintrackError> {
        let group = self
            .storage
            .get_group(group_id)
            .await?
            .ok_or_else(|| FintrackError::GroupNotFound(group_id.to_string()))?;
        if group.created_by != user.id {
            warn!("User {} attempted to delete group {} they did not create", user.id, group_id);
            return Err(FintrackError::NotGroupCreator(user.id.clone()));
        }

        let removed_invitations = self.storage.delete_group_cascade(group_id).await?;
        info!("Group {} deleted by {}", group_id, user.id);

        self.log_and_audit(
            Some(group_id),
            GROUP_DELETED,
            json!({ "group_id": group_id, "name": group.name, "removed_invitations": removed_invitations }),
            Some(&user.id),
        )
        .await?;

        Ok(removed_invitations)
    }
}
