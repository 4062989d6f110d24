use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::transaction::Currency;

/// The caller as resolved by the authentication provider.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    pub id: String,
    pub email: String,
    pub display_name: Option<String>,
    pub email_verified: bool,
}

impl AuthUser {
    /// Display name, else the local part of the email, else "User".
    pub fn name_or_fallback(&self) -> String {
        if let Some(name) = self.display_name.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
            return name.to_string();
        }
        match self.email.split('@').next() {
            Some(local) if !local.is_empty() => local.to_string(),
            _ => "User".to_string(),
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub photo_url: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub photo_url: Option<String>,
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct NotificationSettings {
    pub email: bool,
    pub push: bool,
    pub weekly: bool,
    pub monthly: bool,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        NotificationSettings {
            email: true,
            push: false,
            weekly: true,
            monthly: true,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserSettings {
    pub currency: Currency,
    pub notifications: NotificationSettings,
    pub budget_alerts: bool,
    pub theme: String,
    pub timezone: String,
}

impl Default for UserSettings {
    fn default() -> Self {
        UserSettings {
            currency: Currency::Usd,
            notifications: NotificationSettings::default(),
            budget_alerts: true,
            theme: "system".to_string(),
            timezone: "auto".to_string(),
        }
    }
}
