//! Persistence contract for transactions

use super::datetime::TimeFrame;
use super::error::StorageError;
use super::transaction::Transaction;
use async_trait::async_trait;

/// Result type returned by every [`TransactionStore`] method
pub type StoreResult<T> = Result<T, StorageError>;

/// Storage trait for transactions
///
/// Every lookup and mutation is scoped by owner: a record that exists under
/// another user behaves exactly like a missing one. The ledger is agnostic to
/// the underlying storage mechanism.
#[async_trait]
pub trait TransactionStore: Send + Sync {
    /// Insert a new record and return the identifier assigned to it
    ///
    /// The `id` of the given record is ignored.
    async fn insert(&self, transaction: &Transaction) -> StoreResult<String>;

    /// Point lookup by id and owner
    ///
    /// Returns `Ok(None)` when no such record exists. An id the store cannot
    /// interpret is an error ([`StorageError::InvalidId`]).
    async fn find_one(&self, id: &str, user_id: &str) -> StoreResult<Option<Transaction>>;

    /// All records of an owner, in store order
    async fn find_all(&self, user_id: &str) -> StoreResult<Vec<Transaction>>;

    /// Records of an owner whose date lies within `frame` (inclusive)
    async fn find_in_range(&self, user_id: &str, frame: &TimeFrame)
    -> StoreResult<Vec<Transaction>>;

    /// Overwrite the mutable fields of the record matching `id` + `user_id`
    ///
    /// Returns the number of records matched (0 or 1).
    async fn update_one(&self, transaction: &Transaction) -> StoreResult<u64>;

    /// Delete the record matching `id` + `user_id`
    ///
    /// Returns the number of records removed (0 or 1).
    async fn delete_one(&self, id: &str, user_id: &str) -> StoreResult<u64>;
}
