use chrono::Utc;
use serde_json::json;
use tracing::{debug, info};
use uuid::Uuid;

use super::FintrackService;
use crate::core::constants::{TRANSACTION_CREATED, TRANSACTION_DELETED, TRANSACTION_UPDATED};
use crate::core::errors::FintrackError;
use crate::core::format::format_signed;
use crate::core::models::{AuthUser, NewTransaction, OwnerScope, Transaction, TransactionPatch};
use crate::core::reports::sort_newest_first;
use crate::core::validation::{validate_amount, validate_description, validate_items};
use crate::infrastructure::classifier::Classifier;
use crate::infrastructure::logging::LoggingService;
use crate::infrastructure::storage::Storage;

/// Normalizes a transaction before it is written: trims the description and,
/// when item details are on, replaces the amount with the item total.
/// Items are dropped when item details are off.
fn normalize(transaction: &mut Transaction) -> Result<(), FintrackError> {
    transaction.description = validate_description(&transaction.description)?;
    if transaction.has_item_details {
        let items = transaction.items.as_deref().unwrap_or_default();
        transaction.amount = validate_items(items)?;
    } else {
        transaction.items = None;
    }
    validate_amount("amount", transaction.amount)
}

impl<L: LoggingService, S: Storage, C: Classifier> FintrackService<L, S, C> {
    /// Lists the transactions of `scope`, newest first.
    pub async fn list_transactions(
        &self,
        user: &AuthUser,
        scope: &OwnerScope,
    ) -> Result<Vec<Transaction>, FintrackError> {
        self.authorize_scope(scope, user).await?;
        let mut transactions = self.storage.list_transactions(scope).await?;
        sort_newest_first(&mut transactions);
        debug!("Loaded {} transactions from {}", transactions.len(), scope);
        Ok(transactions)
    }

    pub async fn create_transaction(
        &self,
        user: &AuthUser,
        scope: &OwnerScope,
        input: NewTransaction,
    ) -> Result<Transaction, FintrackError> {
        self.authorize_scope(scope, user).await?;

        let mut transaction = Transaction {
            id: Uuid::new_v4().to_string(),
            date: input.date,
            description: input.description,
            amount: input.amount,
            currency: input.currency,
            kind: input.kind,
            category: input.category,
            items: input.items,
            has_item_details: input.has_item_details,
            group_id: scope.group_id().map(String::from),
            created_by: user.id.clone(),
            created_by_name: scope.group_id().map(|_| user.name_or_fallback()),
        };
        normalize(&mut transaction)?;

        self.storage.insert_transaction(scope, transaction.clone()).await?;
        info!(
            "Created transaction {} in {}: {}",
            transaction.id,
            scope,
            format_signed(transaction.amount, transaction.currency, transaction.kind)
        );

        self.log_and_audit(
            scope.group_id(),
            TRANSACTION_CREATED,
            json!({
                "transaction_id": transaction.id,
                "scope": scope.to_string(),
                "amount": transaction.amount,
                "currency": transaction.currency,
                "type": transaction.kind,
                "created_at": Utc::now(),
            }),
            Some(&user.id),
        )
        .await?;

        Ok(transaction)
    }

    /// Replaces the fields present in `patch`. Creator fields and the owning
    /// collection never change.
    pub async fn update_transaction(
        &self,
        user: &AuthUser,
        scope: &OwnerScope,
        transaction_id: &str,
        patch: TransactionPatch,
    ) -> Result<Transaction, FintrackError> {
        self.authorize_scope(scope, user).await?;
        let mut transaction = self
            .storage
            .get_transaction(scope, transaction_id)
            .await?
            .ok_or_else(|| FintrackError::TransactionNotFound(transaction_id.to_string()))?;

        patch.apply(&mut transaction);
        normalize(&mut transaction)?;

        self.storage.save_transaction(scope, transaction.clone()).await?;
        info!("Updated transaction {} in {}", transaction.id, scope);

        self.log_and_audit(
            scope.group_id(),
            TRANSACTION_UPDATED,
            json!({
                "transaction_id": transaction.id,
                "scope": scope.to_string(),
                "amount": transaction.amount,
                "currency": transaction.currency,
            }),
            Some(&user.id),
        )
        .await?;

        Ok(transaction)
    }

    pub async fn delete_transaction(
        &self,
        user: &AuthUser,
        scope: &OwnerScope,
        transaction_id: &str,
    ) -> Result<(), FintrackError> {
        self.authorize_scope(scope, user).await?;
        if !self.storage.delete_transaction(scope, transaction_id).await? {
            return Err(FintrackError::TransactionNotFound(transaction_id.to_string()));
        }
        info!("Deleted transaction {} from {}", transaction_id, scope);

        self.log_and_audit(
            scope.group_id(),
            TRANSACTION_DELETED,
            json!({ "transaction_id": transaction_id, "scope": scope.to_string() }),
            Some(&user.id),
        )
        .await
    }
}
