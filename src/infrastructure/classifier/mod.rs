pub mod http;

use crate::core::errors::FintrackError;
use async_trait::async_trait;

/// Raw classifier verdict. `category` is free text until checked against [`crate::core::models::Category`].
#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub category: String,
    pub confidence: f64,
}

#[async_trait]
pub trait Classifier: Send + Sync {
    async fn classify(&self, description: &str) -> Result<Classification, FintrackError>;
}
