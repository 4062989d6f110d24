mod groups;
mod profile;
mod reports;
mod suggestions;
mod transactions;

pub use groups::{CreatedInvitation, InvitationLookup};
pub use reports::{CalendarMonth, CsvExport, Dashboard, Report, ReportRequest};
pub use suggestions::CategorySuggestion;

use crate::auth::jwt::JwtService;
use crate::core::errors::FintrackError;
use crate::core::models::{AppLog, AuthUser, Group, OwnerScope};
use crate::infrastructure::classifier::Classifier;
use crate::infrastructure::logging::LoggingService;
use crate::infrastructure::storage::Storage;
use tracing::{error, warn};

pub struct FintrackService<L: LoggingService, S: Storage, C: Classifier> {
    storage: S,
    logging: L,
    classifier: C,
    jwt_service: JwtService,
    public_origin: String,
}

impl<L: LoggingService, S: Storage, C: Classifier> FintrackService<L, S, C> {
    pub fn new(storage: S, logging: L, classifier: C, jwt_secret: String, public_origin: String) -> Self {
        FintrackService {
            storage,
            logging,
            classifier,
            jwt_service: JwtService::new(jwt_secret),
            public_origin,
        }
    }

    pub fn validate_token(&self, token: &str) -> Result<AuthUser, FintrackError> {
        self.jwt_service.validate_token(token)
    }

    pub fn jwt_service(&self) -> &JwtService {
        &self.jwt_service
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub async fn get_app_logs(&self, user: &AuthUser) -> Result<Vec<AppLog>, FintrackError> {
        self.logging.get_logs_for_user(&user.id).await
    }

    async fn log_and_audit(
        &self,
        group_id: Option<&str>,
        action: &str,
        details: serde_json::Value,
        user_id: Option<&str>,
    ) -> Result<(), FintrackError> {
        self.logging
            .log_action(action, details, user_id, group_id)
            .await
            .inspect_err(|e| error!("Failed to record {}: {}", action, e))
    }

    async fn validate_group_membership(&self, group_id: &str, user_id: &str) -> Result<Group, FintrackError> {
        let group = self
            .storage
            .get_group(group_id)
            .await?
            .ok_or_else(|| FintrackError::GroupNotFound(group_id.to_string()))?;
        if !group.is_member(user_id) {
            warn!("User {} attempted to access group {} without membership", user_id, group_id);
            return Err(FintrackError::NotGroupMember(user_id.to_string()));
        }
        Ok(group)
    }

    /// Checks that `user` may address `scope`: their own collection, or a group they belong to.
    async fn authorize_scope(&self, scope: &OwnerScope, user: &AuthUser) -> Result<Option<Group>, FintrackError> {
        match scope {
            OwnerScope::User(id) if *id == user.id => Ok(None),
            OwnerScope::User(id) => {
                warn!("User {} attempted to access transactions of {}", user.id, id);
                Err(FintrackError::Unauthorized(format!(
                    "Cannot access transactions of user {}",
                    id
                )))
            }
            OwnerScope::Group(group_id) => self.validate_group_membership(group_id, &user.id).await.map(Some),
        }
    }
}
