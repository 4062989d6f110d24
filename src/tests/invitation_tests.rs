use chrono::{DateTime, Duration, Utc};

use crate::core::errors::FintrackError;
use crate::core::models::{GroupInvitation, InvitationStatus};
use crate::core::token::{generate_invite_token, invite_link};
use crate::infrastructure::storage::Storage;
use crate::tests::{TEST_ORIGIN, alice, at, bob, carol, create_test_service, test_user};

#[test]
fn test_invite_tokens_are_random_hex() {
    let first = generate_invite_token();
    let second = generate_invite_token();
    assert_eq!(first.len(), 64);
    assert!(first.chars().all(|c| c.is_ascii_hexdigit()));
    assert_ne!(first, second);
}

fn invitation_expiring_at(expires_at: DateTime<Utc>, status: InvitationStatus) -> GroupInvitation {
    GroupInvitation {
        id: "inv-1".to_string(),
        group_id: "group-1".to_string(),
        group_name: "Flat".to_string(),
        invited_by: "alice-id".to_string(),
        invited_by_name: "Alice".to_string(),
        invited_email: "bob@example.com".to_string(),
        status,
        created_at: expires_at - Duration::days(7),
        expires_at,
        invite_token: "ab".repeat(32),
    }
}

#[test]
fn test_invitation_valid_through_its_expiry_instant() {
    let expires_at = at(2024, 6, 8);
    let invitation = invitation_expiring_at(expires_at, InvitationStatus::Pending);

    assert!(!invitation.is_expired_at(expires_at));
    assert!(invitation.is_valid_at(expires_at));
    assert_eq!(invitation.effective_status(expires_at), InvitationStatus::Pending);
    assert_eq!(invitation.invalid_reason_at(expires_at), None);

    let just_after = expires_at + Duration::nanoseconds(1);
    assert!(invitation.is_expired_at(just_after));
    assert!(!invitation.is_valid_at(just_after));
    assert_eq!(invitation.effective_status(just_after), InvitationStatus::Expired);
    assert_eq!(invitation.invalid_reason_at(just_after), Some("This invitation has expired"));
}

#[test]
fn test_answered_invitation_keeps_status_after_expiry() {
    let expires_at = at(2024, 6, 8);
    let accepted = invitation_expiring_at(expires_at, InvitationStatus::Accepted);

    assert!(!accepted.is_valid_at(expires_at));
    assert_eq!(accepted.invalid_reason_at(expires_at), Some("This invitation has already been used"));
    let later = expires_at + Duration::days(1);
    assert_eq!(accepted.effective_status(later), InvitationStatus::Accepted);
    assert_eq!(accepted.invalid_reason_at(later), Some("This invitation has expired"));
}

#[test]
fn test_invite_link_shape() {
    assert_eq!(
        invite_link("https://app.example.com/", "abc123"),
        "https://app.example.com/dashboard/groups/invite/abc123"
    );
}

#[tokio::test]
async fn test_create_invitation() {
    let service = create_test_service();
    let group = service.create_group(&alice(), "Trip", "").await.unwrap();

    let created = service
        .create_invitation(&alice(), &group.id, "  bob@example.com ")
        .await
        .unwrap();
    let invitation = &created.invitation;

    assert_eq!(invitation.group_id, group.id);
    assert_eq!(invitation.group_name, "Trip");
    assert_eq!(invitation.invited_by, alice().id);
    assert_eq!(invitation.invited_by_name, "Alice");
    assert_eq!(invitation.invited_email, "bob@example.com");
    assert_eq!(invitation.status, InvitationStatus::Pending);
    assert_eq!(invitation.expires_at - invitation.created_at, Duration::days(7));
    assert_eq!(
        created.link,
        format!("{}/dashboard/groups/invite/{}", TEST_ORIGIN, invitation.invite_token)
    );

    let pending = service.list_pending_invitations(&bob()).await.unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].id, invitation.id);
}

#[tokio::test]
async fn test_invitation_requires_membership_and_valid_email() {
    let service = create_test_service();
    let group = service.create_group(&alice(), "Trip", "").await.unwrap();

    let result = service.create_invitation(&bob(), &group.id, "carol@example.com").await;
    assert!(matches!(result, Err(FintrackError::NotGroupMember(_))));

    let result = service.create_invitation(&alice(), &group.id, "not-an-email").await;
    assert!(matches!(result, Err(FintrackError::InvalidEmail(_))));
}

#[tokio::test]
async fn test_accept_invitation_adds_member() {
    let service = create_test_service();
    let group = service.create_group(&alice(), "Trip", "").await.unwrap();
    let created = service.create_invitation(&alice(), &group.id, "bob@example.com").await.unwrap();

    let joined = service.accept_invitation(&bob(), &created.invitation.id).await.unwrap();
    assert!(joined.is_member(&bob().id));
    assert_eq!(joined.members.len(), 2);

    let stored = service.storage().get_invitation(&created.invitation.id).await.unwrap().unwrap();
    assert_eq!(stored.status, InvitationStatus::Accepted);
    assert!(service.list_pending_invitations(&bob()).await.unwrap().is_empty());

    let lookup = service.get_invitation_by_token(&created.invitation.invite_token).await.unwrap();
    assert!(!lookup.valid);
    assert_eq!(lookup.reason.as_deref(), Some("This invitation has already been used"));

    let result = service.accept_invitation(&bob(), &created.invitation.id).await;
    assert!(matches!(result, Err(FintrackError::InvitationAlreadyUsed)));
}

#[tokio::test]
async fn test_accept_requires_matching_email() {
    let service = create_test_service();
    let group = service.create_group(&alice(), "Trip", "").await.unwrap();
    let created = service.create_invitation(&alice(), &group.id, "bob@example.com").await.unwrap();

    let result = service.accept_invitation(&carol(), &created.invitation.id).await;
    assert!(matches!(result, Err(FintrackError::InvitationEmailMismatch)));

    let group = service.get_group(&alice(), &group.id).await.unwrap();
    assert!(!group.is_member(&carol().id));
}

#[tokio::test]
async fn test_accept_when_already_member_leaves_invitation_pending() {
    let service = create_test_service();
    let group = service.create_group(&alice(), "Trip", "").await.unwrap();
    let first = service.create_invitation(&alice(), &group.id, "bob@example.com").await.unwrap();
    let second = service.create_invitation(&alice(), &group.id, "bob@example.com").await.unwrap();
    service.accept_invitation(&bob(), &first.invitation.id).await.unwrap();

    let result = service.accept_invitation(&bob(), &second.invitation.id).await;
    assert!(matches!(result, Err(FintrackError::AlreadyGroupMember(_))));

    let stored = service.storage().get_invitation(&second.invitation.id).await.unwrap().unwrap();
    assert_eq!(stored.status, InvitationStatus::Pending);
    let group = service.get_group(&alice(), &group.id).await.unwrap();
    assert_eq!(group.members.len(), 2);
}

#[tokio::test]
async fn test_reject_invitation() {
    let service = create_test_service();
    let group = service.create_group(&alice(), "Trip", "").await.unwrap();
    let created = service.create_invitation(&alice(), &group.id, "bob@example.com").await.unwrap();

    service.reject_invitation(&bob(), &created.invitation.id).await.unwrap();

    let stored = service.storage().get_invitation(&created.invitation.id).await.unwrap().unwrap();
    assert_eq!(stored.status, InvitationStatus::Rejected);
    let group = service.get_group(&alice(), &group.id).await.unwrap();
    assert!(!group.is_member(&bob().id));

    let result = service.accept_invitation(&bob(), &created.invitation.id).await;
    assert!(matches!(result, Err(FintrackError::InvitationAlreadyUsed)));
}

#[tokio::test]
async fn test_expired_invitation_cannot_be_accepted() {
    let service = create_test_service();
    let group = service.create_group(&alice(), "Trip", "").await.unwrap();
    let created = service.create_invitation(&alice(), &group.id, "bob@example.com").await.unwrap();

    // Issued eight days ago.
    let mut invitation = created.invitation.clone();
    invitation.created_at = Utc::now() - Duration::days(8);
    invitation.expires_at = invitation.created_at + Duration::days(7);
    service.storage().save_invitation(invitation.clone()).await.unwrap();

    let lookup = service.get_invitation_by_token(&invitation.invite_token).await.unwrap();
    assert!(!lookup.valid);
    assert_eq!(lookup.reason.as_deref(), Some("This invitation has expired"));

    let result = service.accept_invitation(&bob(), &invitation.id).await;
    assert!(matches!(result, Err(FintrackError::InvitationExpired)));

    let group = service.get_group(&alice(), &group.id).await.unwrap();
    assert!(!group.is_member(&bob().id));
    assert!(service.list_pending_invitations(&bob()).await.unwrap().is_empty());

    // Expiry is computed, never written back.
    let stored = service.storage().get_invitation(&invitation.id).await.unwrap().unwrap();
    assert_eq!(stored.status, InvitationStatus::Pending);
    assert_eq!(stored.effective_status(Utc::now()), InvitationStatus::Expired);
}

#[tokio::test]
async fn test_lookup_unknown_token() {
    let service = create_test_service();
    let result = service.get_invitation_by_token("deadbeef").await;
    assert!(matches!(result, Err(FintrackError::InvitationNotFound(_))));
}

#[tokio::test]
async fn test_invitation_email_match_is_exact() {
    let service = create_test_service();
    let group = service.create_group(&alice(), "Trip", "").await.unwrap();
    let created = service.create_invitation(&alice(), &group.id, "Dave@Example.com").await.unwrap();

    let lowercase = test_user("dave-id", "dave@example.com", "Dave");
    let result = service.accept_invitation(&lowercase, &created.invitation.id).await;
    assert!(matches!(result, Err(FintrackError::InvitationEmailMismatch)));

    let exact = test_user("dave-id", "Dave@Example.com", "Dave");
    assert!(service.accept_invitation(&exact, &created.invitation.id).await.is_ok());
}
