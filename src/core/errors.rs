use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub title: String,
    pub description: String,
}

#[derive(Error, Debug, Serialize)]
pub enum FintrackError {
    #[error("Invalid input for field `{0}`: {1:?}")]
    InvalidInput(String, FieldError),
    #[error("Invalid email format: {0}")]
    InvalidEmail(String),
    #[error("Transaction {0} not found")]
    TransactionNotFound(String),
    #[error("Group {0} not found")]
    GroupNotFound(String),
    #[error("Invitation {0} not found")]
    InvitationNotFound(String),
    #[error("User {0} is not a group member")]
    NotGroupMember(String),
    #[error("User {0} is already a group member")]
    AlreadyGroupMember(String),
    #[error("User {0} did not create this group")]
    NotGroupCreator(String),
    #[error("Invitation was issued to a different email address")]
    InvitationEmailMismatch,
    #[error("This invitation has expired")]
    InvitationExpired,
    #[error("This invitation has already been used")]
    InvitationAlreadyUsed,
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
    #[error("Category suggestion failed: {0}")]
    ClassifierError(String),
    #[error("Storage error: {0}")]
    StorageError(String),
    #[error("Logging error: {0}")]
    LoggingError(String),
    #[error("Internal server error: {0}")]
    InternalServerError(String),
}

impl FintrackError {
    /// Builds an [`FintrackError::InvalidInput`] for a single form field.
    pub fn invalid(field: &str, title: impl Into<String>, description: impl Into<String>) -> Self {
        FintrackError::InvalidInput(
            field.to_string(),
            FieldError {
                field: field.to_string(),
                title: title.into(),
                description: description.into(),
            },
        )
    }
}
