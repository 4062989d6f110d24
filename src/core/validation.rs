use crate::core::constants::{
    MAX_DESCRIPTION_LENGTH, MAX_GROUP_DESCRIPTION_LENGTH, MAX_GROUP_NAME_LENGTH, MIN_DESCRIPTION_LENGTH,
};
use crate::core::errors::FintrackError;
use crate::core::models::TransactionItem;

/// Trims and checks a transaction description, returning the trimmed text.
pub fn validate_description(value: &str) -> Result<String, FintrackError> {
    let trimmed = value.trim();
    if trimmed.chars().count() < MIN_DESCRIPTION_LENGTH {
        return Err(FintrackError::invalid(
            "description",
            "Invalid description",
            format!("Description must be at least {} characters", MIN_DESCRIPTION_LENGTH),
        ));
    }
    if trimmed.chars().count() > MAX_DESCRIPTION_LENGTH {
        return Err(FintrackError::invalid(
            "description",
            "Description Too Long",
            format!("Description cannot exceed {} characters", MAX_DESCRIPTION_LENGTH),
        ));
    }
    // One description, one exported CSV line.
    if trimmed.chars().any(char::is_control) {
        return Err(FintrackError::invalid(
            "description",
            "Invalid description",
            "Description cannot contain line breaks or control characters",
        ));
    }
    Ok(trimmed.to_string())
}

pub fn validate_amount(field: &str, amount: f64) -> Result<(), FintrackError> {
    if !amount.is_finite() {
        return Err(FintrackError::invalid(
            field,
            "Invalid Amount",
            "Amount must be a finite number",
        ));
    }
    if amount <= 0.0 {
        return Err(FintrackError::invalid(
            field,
            "Invalid Amount",
            "Amount must be greater than 0",
        ));
    }
    Ok(())
}

/// Checks an item breakdown and returns its total.
pub fn validate_items(items: &[TransactionItem]) -> Result<f64, FintrackError> {
    if items.is_empty() {
        return Err(FintrackError::invalid(
            "items",
            "Missing items",
            "At least one item is required when item details are enabled",
        ));
    }
    for (i, item) in items.iter().enumerate() {
        if item.description.trim().is_empty() {
            return Err(FintrackError::invalid(
                &format!("items[{}].description", i),
                "Invalid item",
                "Item description cannot be empty",
            ));
        }
        validate_amount(&format!("items[{}].quantity", i), item.quantity)?;
        validate_amount(&format!("items[{}].unitPrice", i), item.unit_price)?;
    }
    Ok(items.iter().map(TransactionItem::total).sum())
}

pub fn validate_group_name(value: &str) -> Result<String, FintrackError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(FintrackError::invalid(
            "name",
            "Invalid name",
            "Group name cannot be empty",
        ));
    }
    if trimmed.chars().count() > MAX_GROUP_NAME_LENGTH {
        return Err(FintrackError::invalid(
            "name",
            "Name Too Long",
            format!("Group name cannot exceed {} characters", MAX_GROUP_NAME_LENGTH),
        ));
    }
    if trimmed.chars().any(|c| c.is_control() || "<>{}[]".contains(c)) {
        return Err(FintrackError::invalid(
            "name",
            "Invalid name",
            "Group name contains invalid characters",
        ));
    }
    Ok(trimmed.to_string())
}

pub fn validate_group_description(value: &str) -> Result<String, FintrackError> {
    let trimmed = value.trim();
    if trimmed.chars().count() > MAX_GROUP_DESCRIPTION_LENGTH {
        return Err(FintrackError::invalid(
            "description",
            "Description Too Long",
            format!("Group description cannot exceed {} characters", MAX_GROUP_DESCRIPTION_LENGTH),
        ));
    }
    Ok(trimmed.to_string())
}

/// Trims an email address and applies a shape check. Case is preserved.
pub fn validate_email(value: &str) -> Result<String, FintrackError> {
    let trimmed = value.trim();
    let well_formed = match trimmed.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
        }
        None => false,
    };
    if !well_formed || trimmed.chars().any(char::is_whitespace) {
        return Err(FintrackError::InvalidEmail(trimmed.to_string()));
    }
    Ok(trimmed.to_string())
}
