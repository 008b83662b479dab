//! The transaction service: business rules on top of the two collaborators
//!
//! Every operation resolves the owning user first and only then touches the
//! store. The service keeps no state of its own between calls; it can be
//! cloned freely and shared across request handlers.

use super::datetime::{TimeFrame, compose_timestamp, parse_date_time};
use super::error::{LedgerError, LedgerResult, ValidationError};
use super::identity::IdentityValidator;
use super::store::TransactionStore;
use super::transaction::{
    DEFAULT_CATEGORY, DateRange, NewTransaction, Transaction, TransactionPatch, UserIdentity,
};
use chrono::Utc;
use std::sync::Arc;

/// Orchestrates identity checks, validation and persistence of transactions
#[derive(Clone)]
pub struct TransactionService {
    store: Arc<dyn TransactionStore>,
    identity: Arc<dyn IdentityValidator>,
}

impl TransactionService {
    pub fn new(store: Arc<dyn TransactionStore>, identity: Arc<dyn IdentityValidator>) -> Self {
        Self { store, identity }
    }

    /// Record a new transaction and return its identifier
    pub async fn create(&self, input: NewTransaction) -> LedgerResult<String> {
        // Also rejects NaN
        if !(input.cost >= 0.0) {
            return Err(ValidationError::NegativeCost { cost: input.cost }.into());
        }

        self.ensure_user(&input.user_id).await?;

        if input.name.is_empty() {
            return Err(missing_name());
        }

        let category = if input.category.is_empty() {
            DEFAULT_CATEGORY.to_string()
        } else {
            input.category
        };

        let date = match input.date.as_deref() {
            Some(value) => parse_date_time(value)?,
            None => Utc::now(),
        };

        let record = Transaction::unsaved(input.user_id, category, input.name, input.cost, date);
        let id = self.store.insert(&record).await.inspect_err(|e| {
            tracing::warn!(user_id = %record.user_id, error = %e, "failed to insert transaction");
        })?;

        tracing::debug!(user_id = %record.user_id, transaction_id = %id, "transaction created");
        Ok(id)
    }

    /// Fetch one transaction of a user
    ///
    /// A missing record is `Ok(None)`; deciding how to report it is left to
    /// the caller.
    pub async fn get(&self, id: &str, user_id: &str) -> LedgerResult<Option<Transaction>> {
        self.ensure_user(user_id).await?;

        let found = self.store.find_one(id, user_id).await.inspect_err(|e| {
            tracing::warn!(user_id, transaction_id = id, error = %e, "failed to fetch transaction");
        })?;
        Ok(found)
    }

    /// All transactions of a user, in store order
    pub async fn list(&self, user_id: &str) -> LedgerResult<Vec<Transaction>> {
        self.ensure_user(user_id).await?;

        let transactions = self.store.find_all(user_id).await.inspect_err(|e| {
            tracing::warn!(user_id, error = %e, "failed to list transactions");
        })?;
        Ok(transactions)
    }

    /// Transactions of a user dated within the given calendar days
    ///
    /// Both bounds are inclusive whole days; a missing bound is open.
    pub async fn list_in_range(
        &self,
        user_id: &str,
        range: &DateRange,
    ) -> LedgerResult<Vec<Transaction>> {
        self.ensure_user(user_id).await?;

        let frame = TimeFrame::resolve(
            range.start_date.as_deref(),
            range.end_date.as_deref(),
            Utc::now(),
        )?;

        let transactions = self
            .store
            .find_in_range(user_id, &frame)
            .await
            .inspect_err(|e| {
                tracing::warn!(user_id, error = %e, "failed to query transactions by time frame");
            })?;
        Ok(transactions)
    }

    /// Apply a partial update and return the stored result
    pub async fn update(&self, patch: TransactionPatch) -> LedgerResult<Transaction> {
        self.ensure_user(&patch.user_id).await?;

        if patch.is_empty() {
            return Err(ValidationError::NoChanges.into());
        }
        if let Some(cost) = patch.cost {
            // Also rejects NaN
            if !(cost >= 0.0) {
                return Err(ValidationError::NegativeCost { cost }.into());
            }
        }
        if patch.name.as_deref() == Some("") {
            return Err(missing_name());
        }

        let existing = self
            .store
            .find_one(&patch.id, &patch.user_id)
            .await?
            .ok_or_else(|| LedgerError::transaction_not_found(&patch.id, &patch.user_id))?;

        let mut updated = patch.merge_into(&existing);
        updated.date =
            compose_timestamp(existing.date, patch.date.as_deref(), patch.time.as_deref())?;

        let matched = self.store.update_one(&updated).await.inspect_err(|e| {
            tracing::warn!(transaction_id = %patch.id, error = %e, "failed to update transaction");
        })?;
        if matched == 0 {
            return Err(LedgerError::ConcurrentModification {
                transaction_id: patch.id,
            });
        }

        // The store does not hand back the written document
        let stored = self
            .store
            .find_one(&patch.id, &patch.user_id)
            .await?
            .ok_or_else(|| LedgerError::ConcurrentModification {
                transaction_id: patch.id.clone(),
            })?;

        tracing::debug!(user_id = %patch.user_id, transaction_id = %patch.id, "transaction updated");
        Ok(stored)
    }

    /// Remove a transaction; removing a missing one is an error
    pub async fn delete(&self, user_id: &str, id: &str) -> LedgerResult<()> {
        self.ensure_user(user_id).await?;

        let deleted = self.store.delete_one(id, user_id).await.inspect_err(|e| {
            tracing::warn!(user_id, transaction_id = id, error = %e, "failed to delete transaction");
        })?;
        if deleted == 0 {
            return Err(LedgerError::transaction_not_found(id, user_id));
        }

        tracing::debug!(user_id, transaction_id = id, "transaction deleted");
        Ok(())
    }

    async fn ensure_user(&self, user_id: &str) -> LedgerResult<UserIdentity> {
        let identity = self.identity.resolve(user_id).await.inspect_err(|e| {
            tracing::warn!(user_id, error = %e, "identity check failed");
        })?;

        identity.ok_or_else(|| LedgerError::user_not_found(user_id))
    }
}

fn missing_name() -> LedgerError {
    ValidationError::MissingField {
        field: "name".to_string(),
    }
    .into()
}
