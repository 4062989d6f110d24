use chrono::Utc;
use serde_json::json;
use tracing::info;

use super::FintrackService;
use crate::core::constants::{PROFILE_UPDATED, SETTINGS_UPDATED};
use crate::core::errors::FintrackError;
use crate::core::models::{AuthUser, ProfileUpdate, UserProfile, UserSettings};
use crate::infrastructure::classifier::Classifier;
use crate::infrastructure::logging::LoggingService;
use crate::infrastructure::storage::Storage;

impl<L: LoggingService, S: Storage, C: Classifier> FintrackService<L, S, C> {
    /// Returns the stored profile, creating it on first access.
    pub async fn get_profile(&self, user: &AuthUser) -> Result<UserProfile, FintrackError> {
        if let Some(profile) = self.storage.get_profile(&user.id).await? {
            return Ok(profile);
        }

        let now = Utc::now();
        let profile = UserProfile {
            name: user
                .display_name
                .clone()
                .filter(|n| !n.trim().is_empty())
                .unwrap_or_else(|| user.email.clone()),
            email: user.email.clone(),
            photo_url: String::new(),
            created_at: now,
            updated_at: now,
        };
        self.storage.save_profile(&user.id, profile.clone()).await?;
        info!("Created profile for {}", user.id);
        Ok(profile)
    }

    /// Merges the provided fields into the profile and stamps `updatedAt`.
    pub async fn update_profile(&self, user: &AuthUser, update: ProfileUpdate) -> Result<UserProfile, FintrackError> {
        let mut profile = self.get_profile(user).await?;

        if let Some(name) = update.name {
            let name = name.trim();
            if name.is_empty() {
                return Err(FintrackError::invalid("name", "Invalid name", "Name cannot be empty"));
            }
            profile.name = name.to_string();
        }
        if let Some(photo_url) = update.photo_url {
            profile.photo_url = photo_url.trim().to_string();
        }
        profile.updated_at = Utc::now();

        self.storage.save_profile(&user.id, profile.clone()).await?;
        self.log_and_audit(
            None,
            PROFILE_UPDATED,
            json!({ "user_id": user.id, "name": profile.name }),
            Some(&user.id),
        )
        .await?;

        Ok(profile)
    }

    /// Stored settings, or the defaults when the user never saved any.
    pub async fn get_settings(&self, user: &AuthUser) -> Result<UserSettings, FintrackError> {
        Ok(self.storage.get_settings(&user.id).await?.unwrap_or_default())
    }

    pub async fn save_settings(&self, user: &AuthUser, settings: UserSettings) -> Result<UserSettings, FintrackError> {
        self.storage.save_settings(&user.id, settings.clone()).await?;
        self.log_and_audit(
            None,
            SETTINGS_UPDATED,
            json!({ "user_id": user.id, "currency": settings.currency, "theme": settings.theme }),
            Some(&user.id),
        )
        .await?;
        Ok(settings)
    }
}
