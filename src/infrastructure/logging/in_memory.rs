use crate::core::errors::FintrackError;
use crate::core::models::AppLog;
use crate::infrastructure::logging::LoggingService;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Clone, Default)]
pub struct InMemoryLogging {
    logs: Arc<RwLock<Vec<AppLog>>>,
}

impl InMemoryLogging {
    pub fn new() -> Self {
        InMemoryLogging {
            logs: Arc::new(RwLock::new(Vec::new())),
        }
    }
}

#[async_trait]
impl LoggingService for InMemoryLogging {
    async fn log_action(
        &self,
        action: &str,
        details: serde_json::Value,
        user_id: Option<&str>,
        group_id: Option<&str>,
    ) -> Result<(), FintrackError> {
        if !details.is_object() {
            return Err(FintrackError::LoggingError(format!(
                "Log details for {} must be a JSON object",
                action
            )));
        }
        let mut logs = self.logs.write().await;
        logs.push(AppLog {
            id: Uuid::new_v4().to_string(),
            action: action.to_string(),
            user_id: user_id.map(String::from),
            group_id: group_id.map(String::from),
            details,
            timestamp: chrono::Utc::now(),
        });
        Ok(())
    }

    async fn get_logs_for_user(&self, user_id: &str) -> Result<Vec<AppLog>, FintrackError> {
        let logs = self.logs.read().await;
        Ok(logs
            .iter()
            .filter(|l| l.user_id.as_deref() == Some(user_id))
            .cloned()
            .collect())
    }
}
