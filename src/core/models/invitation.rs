use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum InvitationStatus {
    Pending,
    Accepted,
    Rejected,
    Expired,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GroupInvitation {
    pub id: String,
    pub group_id: String,
    pub group_name: String,
    pub invited_by: String,
    pub invited_by_name: String,
    pub invited_email: String,
    pub status: InvitationStatus,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub invite_token: String,
}

impl GroupInvitation {
    /// An invitation is still usable up to and including its expiry instant.
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }

    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.status == InvitationStatus::Pending && !self.is_expired_at(now)
    }

    /// Stored status with expiry applied. Expiry is never written back.
    pub fn effective_status(&self, now: DateTime<Utc>) -> InvitationStatus {
        match self.status {
            InvitationStatus::Pending if self.is_expired_at(now) => InvitationStatus::Expired,
            status => status,
        }
    }

    /// Why the invitation can no longer be used. Expiry is reported before reuse.
    pub fn invalid_reason_at(&self, now: DateTime<Utc>) -> Option<&'static str> {
        if self.is_expired_at(now) {
            Some("This invitation has expired")
        } else if self.status != InvitationStatus::Pending {
            Some("This invitation has already been used")
        } else {
            None
        }
    }
}
