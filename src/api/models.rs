use axum::{Json, http::StatusCode, response::IntoResponse};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::core::errors::FintrackError;
use crate::core::reports::{CurrencyFilter, ReportPeriod};
use crate::core::services::ReportRequest;

// Request structs for JSON payloads
#[derive(Deserialize, ToSchema)]
pub struct CreateGroupRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Deserialize, ToSchema)]
pub struct CreateInvitationRequest {
    pub email: String,
}

#[derive(Deserialize, ToSchema)]
pub struct SuggestCategoryRequest {
    pub description: String,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LeaveGroupResponse {
    pub group_deleted: bool,
}

#[derive(Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteGroupResponse {
    pub removed_invitations: usize,
}

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

fn parse_currency(value: Option<&str>) -> Result<CurrencyFilter, FintrackError> {
    match value {
        None => Ok(CurrencyFilter::All),
        Some(raw) => raw.parse().map_err(|e: String| {
            FintrackError::invalid("currency", "Invalid currency", e)
        }),
    }
}

#[derive(Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ReportQuery {
    /// Group to report on; the caller's own transactions when absent.
    pub group_id: Option<String>,
    #[param(value_type = Option<String>, example = "current-month")]
    pub period: Option<ReportPeriod>,
    /// Currency code or `all`.
    pub currency: Option<String>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

impl TryFrom<ReportQuery> for ReportRequest {
    type Error = FintrackError;

    fn try_from(query: ReportQuery) -> Result<Self, Self::Error> {
        Ok(ReportRequest {
            currency: parse_currency(query.currency.as_deref())?,
            group_id: query.group_id,
            period: query.period.unwrap_or_default(),
            from: query.from,
            to: query.to,
        })
    }
}

#[derive(Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct DashboardQuery {
    pub group_id: Option<String>,
}

#[derive(Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct CalendarQuery {
    pub year: i32,
    pub month: u32,
    pub group_id: Option<String>,
    pub currency: Option<String>,
    /// Also return the transactions of this day.
    pub day: Option<NaiveDate>,
}

impl CalendarQuery {
    pub fn currency_filter(&self) -> Result<CurrencyFilter, FintrackError> {
        parse_currency(self.currency.as_deref())
    }
}

// Error response struct
#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

// Newtype wrapper for FintrackError to implement IntoResponse
pub struct ApiError(pub FintrackError);

impl From<FintrackError> for ApiError {
    fn from(err: FintrackError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let (status, error_message) = match self.0 {
            FintrackError::InvalidInput(field, detail) => (
                StatusCode::BAD_REQUEST,
                format!("Invalid input for {}: {}", field, detail.description),
            ),
            FintrackError::InvalidEmail(email) => (StatusCode::BAD_REQUEST, format!("Invalid email: {}", email)),
            FintrackError::TransactionNotFound(id) => {
                (StatusCode::NOT_FOUND, format!("Transaction {} not found", id))
            }
            FintrackError::GroupNotFound(id) => (StatusCode::NOT_FOUND, format!("Group {} not found", id)),
            FintrackError::InvitationNotFound(_) => (StatusCode::NOT_FOUND, "Invitation not found".to_string()),
            FintrackError::NotGroupMember(id) => {
                (StatusCode::FORBIDDEN, format!("User {} is not a group member", id))
            }
            FintrackError::NotGroupCreator(_) => (
                StatusCode::FORBIDDEN,
                "Only the group creator can delete this group".to_string(),
            ),
            FintrackError::InvitationEmailMismatch => (
                StatusCode::FORBIDDEN,
                "This invitation was sent to a different email address".to_string(),
            ),
            FintrackError::AlreadyGroupMember(id) => {
                (StatusCode::CONFLICT, format!("User {} is already a group member", id))
            }
            err @ FintrackError::InvitationExpired => (StatusCode::GONE, err.to_string()),
            err @ FintrackError::InvitationAlreadyUsed => (StatusCode::CONFLICT, err.to_string()),
            FintrackError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, format!("Unauthorized: {}", msg)),
            FintrackError::ClassifierError(msg) => (
                StatusCode::BAD_GATEWAY,
                format!("Failed to get suggestion from AI: {}", msg),
            ),
            FintrackError::StorageError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, format!("Storage error: {}", msg)),
            FintrackError::LoggingError(msg) => (StatusCode::INTERNAL_SERVER_ERROR, format!("Logging error: {}", msg)),
            FintrackError::InternalServerError(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Internal server error: {}", msg),
            ),
        };
        (status, Json(ErrorResponse { error: error_message })).into_response()
    }
}
