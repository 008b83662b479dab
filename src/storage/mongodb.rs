//! MongoDB storage backend using the official MongoDB async driver.
//!
//! Provides [`MongoTransactionStore`], a [`TransactionStore`] backed by a single
//! collection (`transactions` by default) of a `mongodb::Database`.
//!
//! # Feature flag
//!
//! This module is gated behind the `mongodb_backend` feature flag:
//! ```toml
//! [dependencies]
//! tx-ledger = { version = "0.1", features = ["mongodb_backend"] }
//! ```
//!
//! # Storage model
//!
//! Each transaction is one document. The identifier is the document's
//! `ObjectId`, exposed to callers as its 24-character hex string. Timestamps
//! are stored as native BSON datetimes, so range queries run on the server and
//! keep millisecond precision.

use crate::core::{StorageError, StoreResult, TimeFrame, Transaction, TransactionStore};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::TryStreamExt;
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{self, Document, doc};
use mongodb::{Client, Collection, Database};
use serde::{Deserialize, Serialize};

const BACKEND: &str = "mongodb";

/// Database used when the configuration does not name one
pub const DEFAULT_DATABASE: &str = "moneykeeper";

/// Collection used when the configuration does not name one
pub const DEFAULT_COLLECTION: &str = "transactions";

// ---------------------------------------------------------------------------
// Document mapping
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, Deserialize)]
struct TransactionDocument {
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    id: Option<ObjectId>,
    user_id: String,
    category: String,
    name: String,
    cost: f64,
    date: bson::DateTime,
}

impl TransactionDocument {
    fn from_transaction(tx: &Transaction) -> Self {
        Self {
            id: None,
            user_id: tx.user_id.clone(),
            category: tx.category.clone(),
            name: tx.name.clone(),
            cost: tx.cost,
            date: to_bson_date(&tx.date),
        }
    }

    fn into_transaction(self) -> StoreResult<Transaction> {
        let id = self.id.ok_or_else(|| StorageError::Integrity {
            message: "document without _id".to_string(),
        })?;
        let date = DateTime::<Utc>::from_timestamp_millis(self.date.timestamp_millis())
            .ok_or_else(|| StorageError::Integrity {
                message: format!("date out of range in document {}", id.to_hex()),
            })?;

        Ok(Transaction {
            id: id.to_hex(),
            user_id: self.user_id,
            category: self.category,
            name: self.name,
            cost: self.cost,
            date,
        })
    }
}

fn to_bson_date(date: &DateTime<Utc>) -> bson::DateTime {
    bson::DateTime::from_millis(date.timestamp_millis())
}

fn parse_object_id(id: &str) -> StoreResult<ObjectId> {
    ObjectId::parse_str(id).map_err(|_| StorageError::InvalidId { id: id.to_string() })
}

fn query_error(context: &str, e: mongodb::error::Error) -> StorageError {
    StorageError::Query {
        backend: BACKEND.to_string(),
        message: format!("{}: {}", context, e),
    }
}

// ---------------------------------------------------------------------------
// MongoTransactionStore
// ---------------------------------------------------------------------------

/// Transaction store backed by MongoDB.
///
/// # Example
///
/// ```rust,ignore
/// use ledger::storage::MongoTransactionStore;
///
/// let store = MongoTransactionStore::connect("mongodb://localhost:27017", "moneykeeper").await?;
/// store.ensure_indexes().await?;
/// ```
#[derive(Clone, Debug)]
pub struct MongoTransactionStore {
    database: Database,
    collection_name: String,
}

impl MongoTransactionStore {
    /// Create a store on the default `transactions` collection of `database`
    pub fn new(database: Database) -> Self {
        Self {
            database,
            collection_name: DEFAULT_COLLECTION.to_string(),
        }
    }

    /// Use another collection of the same database
    pub fn with_collection(mut self, name: impl Into<String>) -> Self {
        self.collection_name = name.into();
        self
    }

    /// Connect to a MongoDB deployment and open `database`
    pub async fn connect(uri: &str, database: &str) -> StoreResult<Self> {
        let client = Client::with_uri_str(uri)
            .await
            .map_err(|e| StorageError::Connection {
                backend: BACKEND.to_string(),
                message: e.to_string(),
            })?;

        Ok(Self::new(client.database(database)))
    }

    /// Get a reference to the underlying database.
    pub fn database(&self) -> &Database {
        &self.database
    }

    fn collection(&self) -> Collection<TransactionDocument> {
        self.database.collection(&self.collection_name)
    }

    /// Create the indexes the queries of this store rely on.
    ///
    /// - `user_id: 1` for per-user listings
    /// - `user_id: 1, date: 1` for time-frame queries
    ///
    /// Idempotent; safe to call on every startup.
    pub async fn ensure_indexes(&self) -> StoreResult<()> {
        use mongodb::IndexModel;

        let indexes = vec![
            IndexModel::builder().keys(doc! { "user_id": 1 }).build(),
            IndexModel::builder()
                .keys(doc! { "user_id": 1, "date": 1 })
                .build(),
        ];

        self.collection()
            .create_indexes(indexes)
            .await
            .map_err(|e| query_error("Failed to create indexes", e))?;

        Ok(())
    }

    async fn find_many(&self, filter: Document) -> StoreResult<Vec<Transaction>> {
        let cursor = self
            .collection()
            .find(filter)
            .sort(doc! { "_id": 1 })
            .await
            .map_err(|e| query_error("Failed to query transactions", e))?;

        let docs: Vec<TransactionDocument> = cursor
            .try_collect()
            .await
            .map_err(|e| query_error("Failed to collect transactions", e))?;

        docs.into_iter()
            .map(TransactionDocument::into_transaction)
            .collect()
    }
}

#[async_trait]
impl TransactionStore for MongoTransactionStore {
    async fn insert(&self, transaction: &Transaction) -> StoreResult<String> {
        let result = self
            .collection()
            .insert_one(TransactionDocument::from_transaction(transaction))
            .await
            .map_err(|e| query_error("Failed to insert transaction", e))?;

        result
            .inserted_id
            .as_object_id()
            .map(|oid| oid.to_hex())
            .ok_or_else(|| StorageError::Integrity {
                message: format!("unexpected inserted id {}", result.inserted_id),
            })
    }

    async fn find_one(&self, id: &str, user_id: &str) -> StoreResult<Option<Transaction>> {
        let oid = parse_object_id(id)?;

        let doc = self
            .collection()
            .find_one(doc! { "_id": oid, "user_id": user_id })
            .await
            .map_err(|e| query_error("Failed to get transaction", e))?;

        doc.map(TransactionDocument::into_transaction).transpose()
    }

    async fn find_all(&self, user_id: &str) -> StoreResult<Vec<Transaction>> {
        self.find_many(doc! { "user_id": user_id }).await
    }

    async fn find_in_range(
        &self,
        user_id: &str,
        frame: &TimeFrame,
    ) -> StoreResult<Vec<Transaction>> {
        self.find_many(doc! {
            "user_id": user_id,
            "date": {
                "$gte": to_bson_date(&frame.start),
                "$lte": to_bson_date(&frame.end),
            },
        })
        .await
    }

    /// Conditional on both id and owner; a document that is already equal
    /// still counts as matched.
    async fn update_one(&self, transaction: &Transaction) -> StoreResult<u64> {
        let oid = parse_object_id(&transaction.id)?;

        let result = self
            .collection()
            .update_one(
                doc! { "_id": oid, "user_id": transaction.user_id.as_str() },
                doc! {
                    "$set": {
                        "category": transaction.category.as_str(),
                        "name": transaction.name.as_str(),
                        "cost": transaction.cost,
                        "date": to_bson_date(&transaction.date),
                    }
                },
            )
            .await
            .map_err(|e| query_error("Failed to update transaction", e))?;

        Ok(result.matched_count)
    }

    async fn delete_one(&self, id: &str, user_id: &str) -> StoreResult<u64> {
        let oid = parse_object_id(id)?;

        let result = self
            .collection()
            .delete_one(doc! { "_id": oid, "user_id": user_id })
            .await
            .map_err(|e| query_error("Failed to delete transaction", e))?;

        Ok(result.deleted_count)
    }
}
