//! In-memory implementation of TransactionStore for testing and development

use crate::core::{StorageError, StoreResult, TimeFrame, Transaction, TransactionStore};
use async_trait::async_trait;
use indexmap::IndexMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

const BACKEND: &str = "memory";

/// In-memory transaction store
///
/// Records keep their insertion order, so listings are stable across calls.
/// Ids are UUID v4 strings; anything else is rejected as an invalid id.
#[derive(Clone, Default)]
pub struct InMemoryTransactionStore {
    transactions: Arc<RwLock<IndexMap<Uuid, Transaction>>>,
}

impl InMemoryTransactionStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored transactions across all users
    pub fn len(&self) -> usize {
        self.transactions.read().map(|t| t.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn parse_id(id: &str) -> StoreResult<Uuid> {
        Uuid::parse_str(id).map_err(|_| StorageError::InvalidId { id: id.to_string() })
    }

    fn lock_error(e: impl std::fmt::Display, kind: &str) -> StorageError {
        StorageError::Query {
            backend: BACKEND.to_string(),
            message: format!("Failed to acquire {} lock: {}", kind, e),
        }
    }

    fn select<F>(&self, user_id: &str, predicate: F) -> StoreResult<Vec<Transaction>>
    where
        F: Fn(&Transaction) -> bool,
    {
        let transactions = self
            .transactions
            .read()
            .map_err(|e| Self::lock_error(e, "read"))?;

        Ok(transactions
            .values()
            .filter(|tx| tx.user_id == user_id && predicate(tx))
            .cloned()
            .collect())
    }
}

#[async_trait]
impl TransactionStore for InMemoryTransactionStore {
    async fn insert(&self, transaction: &Transaction) -> StoreResult<String> {
        let mut transactions = self
            .transactions
            .write()
            .map_err(|e| Self::lock_error(e, "write"))?;

        let id = Uuid::new_v4();
        let mut stored = transaction.clone();
        stored.id = id.to_string();
        transactions.insert(id, stored);

        Ok(id.to_string())
    }

    async fn find_one(&self, id: &str, user_id: &str) -> StoreResult<Option<Transaction>> {
        let key = Self::parse_id(id)?;
        let transactions = self
            .transactions
            .read()
            .map_err(|e| Self::lock_error(e, "read"))?;

        Ok(transactions
            .get(&key)
            .filter(|tx| tx.user_id == user_id)
            .cloned())
    }

    async fn find_all(&self, user_id: &str) -> StoreResult<Vec<Transaction>> {
        self.select(user_id, |_| true)
    }

    async fn find_in_range(
        &self,
        user_id: &str,
        frame: &TimeFrame,
    ) -> StoreResult<Vec<Transaction>> {
        self.select(user_id, |tx| frame.contains(&tx.date))
    }

    async fn update_one(&self, transaction: &Transaction) -> StoreResult<u64> {
        let key = Self::parse_id(&transaction.id)?;
        let mut transactions = self
            .transactions
            .write()
            .map_err(|e| Self::lock_error(e, "write"))?;

        match transactions.get_mut(&key) {
            Some(stored) if stored.user_id == transaction.user_id => {
                stored.category = transaction.category.clone();
                stored.name = transaction.name.clone();
                stored.cost = transaction.cost;
                stored.date = transaction.date;
                Ok(1)
            }
            _ => Ok(0),
        }
    }

    async fn delete_one(&self, id: &str, user_id: &str) -> StoreResult<u64> {
        let key = Self::parse_id(id)?;
        let mut transactions = self
            .transactions
            .write()
            .map_err(|e| Self::lock_error(e, "write"))?;

        let owned = transactions
            .get(&key)
            .is_some_and(|tx| tx.user_id == user_id);
        if !owned {
            return Ok(0);
        }

        transactions.shift_remove(&key);
        Ok(1)
    }
}
