//! Integration tests for MongoTransactionStore using the store test harness.
//!
//! # Requirements
//!
//! - Docker must be running (testcontainers launches a MongoDB container)
//! - Feature flag `mongodb_backend` must be enabled
//!
//! # Running
//!
//! ```sh
//! cargo test --features mongodb_backend --test mongodb_tests
//! ```
//!
//! # Test isolation
//!
//! All tests share a single MongoDB container (via `OnceCell`). Each test
//! gets its own database.

#![cfg(feature = "mongodb_backend")]

#[macro_use]
mod store_harness;

use ledger::core::TransactionStore;
use ledger::storage::MongoTransactionStore;
use mongodb::Client;
use mongodb::bson::oid::ObjectId;
use std::sync::atomic::{AtomicU64, Ordering};
use store_harness::*;
use testcontainers::runners::AsyncRunner;
use testcontainers_modules::mongo::Mongo;
use tokio::sync::OnceCell;

// ---------------------------------------------------------------------------
// Shared test environment (single container, fresh database per test)
// ---------------------------------------------------------------------------

/// Holds the testcontainer handle (keeps it alive) and the connection URL.
struct MongoTestEnv {
    /// Container handle; dropping this stops the MongoDB container.
    _container: testcontainers::ContainerAsync<Mongo>,
    connection_url: String,
}

/// Global test environment, initialized once per test binary.
static TEST_ENV: OnceCell<MongoTestEnv> = OnceCell::const_new();

async fn init_mongo_env() -> &'static MongoTestEnv {
    TEST_ENV
        .get_or_init(|| async {
            let container = Mongo::default()
                .start()
                .await
                .expect("Failed to start MongoDB container, is Docker running?");

            let host = container.get_host().await.unwrap();
            let port = container.get_host_port_ipv4(27017).await.unwrap();

            MongoTestEnv {
                _container: container,
                connection_url: format!("mongodb://{}:{}", host, port),
            }
        })
        .await
}

/// Atomic counter to generate unique database names per test.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Create a store on a fresh database with indexes in place.
async fn clean_mongo_store() -> MongoTransactionStore {
    let env = init_mongo_env().await;
    let client = Client::with_uri_str(&env.connection_url)
        .await
        .expect("Failed to connect to MongoDB");
    let db_num = DB_COUNTER.fetch_add(1, Ordering::SeqCst);

    let store = MongoTransactionStore::new(client.database(&format!("ledger_test_{}", db_num)));
    store.ensure_indexes().await.expect("Failed to create indexes");
    store
}

// ---------------------------------------------------------------------------
// Test suites via macros
// ---------------------------------------------------------------------------

store_contract_tests!(clean_mongo_store().await, ObjectId::new().to_hex());

#[tokio::test]
async fn test_ensure_indexes_is_idempotent() {
    let store = clean_mongo_store().await;
    store.ensure_indexes().await.unwrap();
}

#[tokio::test]
async fn test_custom_collection_is_isolated() {
    let store = clean_mongo_store().await;
    let other = store.clone().with_collection("archived");

    let id = store
        .insert(&tx("u-1", "coffee", 3.5, at(2024, 1, 1, 9, 0, 0)))
        .await
        .unwrap();

    assert!(other.find_one(&id, "u-1").await.unwrap().is_none());
    assert_eq!(other.find_all("u-1").await.unwrap().len(), 0);
}
