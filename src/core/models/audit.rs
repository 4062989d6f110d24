use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AppLog {
    pub id: String,
    pub action: String,
    pub user_id: Option<String>,
    pub group_id: Option<String>,
    #[schema(value_type = Object)]
    pub details: serde_json::Value,
    pub timestamp: DateTime<Utc>,
}
