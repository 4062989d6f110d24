use serde::Serialize;
use tracing::{debug, error};
use utoipa::ToSchema;

use super::FintrackService;
use crate::core::constants::SUGGESTION_CONFIDENCE_THRESHOLD;
use crate::core::errors::FintrackError;
use crate::core::models::{AuthUser, Category};
use crate::infrastructure::classifier::{Classification, Classifier};
use crate::infrastructure::logging::LoggingService;
use crate::infrastructure::storage::Storage;

#[derive(Debug, Clone, Serialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct CategorySuggestion {
    pub category: Category,
    pub confidence: f64,
}

impl From<Classification> for CategorySuggestion {
    /// Keeps the classifier's category only when it is confident and names a known category.
    /// A confidence outside `[0, 1]` counts as no confidence.
    fn from(classification: Classification) -> Self {
        let confidence = if (0.0..=1.0).contains(&classification.confidence) {
            classification.confidence
        } else {
            0.0
        };
        let category = match classification.category.parse::<Category>() {
            Ok(category) if confidence > SUGGESTION_CONFIDENCE_THRESHOLD => category,
            _ => Category::Other,
        };
        CategorySuggestion { category, confidence }
    }
}

impl<L: LoggingService, S: Storage, C: Classifier> FintrackService<L, S, C> {
    /// Suggests a category for a transaction description. Classifier failures
    /// surface as [`FintrackError::ClassifierError`] and leave nothing changed.
    pub async fn suggest_category(
        &self,
        user: &AuthUser,
        description: &str,
    ) -> Result<CategorySuggestion, FintrackError> {
        let description = description.trim();
        if description.is_empty() {
            return Err(FintrackError::invalid(
                "description",
                "Invalid description",
                "Invalid description provided.",
            ));
        }

        let classification = self.classifier.classify(description).await.map_err(|e| {
            error!("Category suggestion for {} failed: {}", user.id, e);
            match e {
                FintrackError::ClassifierError(_) => e,
                other => FintrackError::ClassifierError(other.to_string()),
            }
        })?;
        let suggestion = CategorySuggestion::from(classification);
        debug!("Suggested {} for user {}", suggestion.category, user.id);
        Ok(suggestion)
    }
}
