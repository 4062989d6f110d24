//! Prompt-driven text classifier reached over HTTP.

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error};

use crate::core::errors::FintrackError;
use crate::core::models::Category;
use crate::infrastructure::classifier::{Classification, Classifier};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

const PROMPT_TEMPLATE: &str = "You are a personal finance expert. Given a transaction description, \
you will suggest a spending category for the transaction.\n\n\
Transaction Description: {description}\n\n\
Consider common spending categories such as:\n{categories}\n\n\
Return the suggested category and a confidence level (0-1) indicating how certain you are of the suggestion. \
The output MUST be in JSON format. The \"suggestedCategory\" field MUST be one of the categories listed above, \
or \"Other\".";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ClassifyRequest<'a> {
    prompt: String,
    transaction_description: &'a str,
    categories: Vec<&'static str>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ClassifyResponse {
    suggested_category: String,
    confidence: f64,
}

fn render_prompt(description: &str) -> String {
    let categories = Category::ALL
        .iter()
        .map(|c| format!("- {}", c.as_str()))
        .collect::<Vec<_>>()
        .join("\n");
    PROMPT_TEMPLATE
        .replace("{description}", description)
        .replace("{categories}", &categories)
}

/// Builder for [`HttpClassifier`].
#[derive(Debug, Default)]
pub struct HttpClassifierBuilder {
    endpoint: Option<String>,
    api_key: Option<String>,
    timeout: Option<Duration>,
}

impl HttpClassifierBuilder {
    #[must_use]
    pub fn endpoint<T: Into<String>>(mut self, url: T) -> Self {
        self.endpoint = Some(url.into());
        self
    }

    /// Sent as a bearer token when present.
    #[must_use]
    pub fn api_key(mut self, key: Option<String>) -> Self {
        self.api_key = key;
        self
    }

    #[must_use]
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Result<HttpClassifier, FintrackError> {
        let endpoint = self
            .endpoint
            .filter(|e| !e.trim().is_empty())
            .ok_or_else(|| FintrackError::ClassifierError("classifier endpoint is not configured".to_string()))?;
        let http = reqwest::Client::builder()
            .timeout(self.timeout.unwrap_or(DEFAULT_TIMEOUT))
            .build()
            .map_err(|e| FintrackError::ClassifierError(format!("failed to build HTTP client: {}", e)))?;

        Ok(HttpClassifier {
            http,
            endpoint,
            api_key: self.api_key,
        })
    }
}

#[derive(Debug, Clone)]
pub struct HttpClassifier {
    http: reqwest::Client,
    endpoint: String,
    api_key: Option<String>,
}

impl HttpClassifier {
    pub fn builder() -> HttpClassifierBuilder {
        HttpClassifierBuilder::default()
    }

    async fn handle_response(response: reqwest::Response) -> Result<ClassifyResponse, FintrackError> {
        let status = response.status();
        if status.is_success() {
            let body = response
                .text()
                .await
                .map_err(|e| FintrackError::ClassifierError(format!("failed to read response: {}", e)))?;
            serde_json::from_str(&body)
                .map_err(|e| FintrackError::ClassifierError(format!("malformed classifier response: {}", e)))
        } else {
            let message = response.text().await.unwrap_or_else(|_| "unknown error".to_owned());
            Err(FintrackError::ClassifierError(format!(
                "classifier returned {}: {}",
                status.as_u16(),
                message
            )))
        }
    }
}

#[async_trait]
impl Classifier for HttpClassifier {
    async fn classify(&self, description: &str) -> Result<Classification, FintrackError> {
        let body = ClassifyRequest {
            prompt: render_prompt(description),
            transaction_description: description,
            categories: Category::ALL.iter().map(Category::as_str).collect(),
        };

        let mut request = self
            .http
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "application/json")
            .json(&body);
        if let Some(key) = &self.api_key {
            request = request.header(AUTHORIZATION, format!("Bearer {}", key));
        }

        let response = request.send().await.map_err(|e| {
            error!("Classifier request to {} failed: {}", self.endpoint, e);
            FintrackError::ClassifierError(format!("request failed: {}", e))
        })?;
        let parsed = Self::handle_response(response).await?;
        debug!(
            "Classifier suggested {} with confidence {}",
            parsed.suggested_category, parsed.confidence
        );

        Ok(Classification {
            category: parsed.suggested_category,
            confidence: parsed.confidence,
        })
    }
}
