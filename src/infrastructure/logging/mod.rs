pub mod in_memory;

use crate::core::errors::FintrackError;
use crate::core::models::AppLog;
use async_trait::async_trait;

#[async_trait]
pub trait LoggingService: Send + Sync {
    async fn log_action(
        &self,
        action: &str,
        details: serde_json::Value,
        user_id: Option<&str>,
        group_id: Option<&str>,
    ) -> Result<(), FintrackError>;
    async fn get_logs_for_user(&self, user_id: &str) -> Result<Vec<AppLog>, FintrackError>;
}
