//! Macro-generated test suite for `TransactionStore` contract validation.
//!
//! # Usage
//!
//! ```rust,ignore
//! #[macro_use]
//! mod store_harness;
//!
//! use store_harness::*;
//! use ledger::storage::InMemoryTransactionStore;
//!
//! store_contract_tests!(InMemoryTransactionStore::new(), uuid::Uuid::new_v4().to_string());
//! ```
//!
//! # Generated Tests
//!
//! ## Insert & lookup
//! - `test_insert_and_find_one` — every field survives the round trip
//! - `test_find_one_other_owner` — lookups are scoped to the owner
//! - `test_find_one_missing` — a well-formed unknown id is `None`
//! - `test_find_one_malformed_id` — a malformed id is `InvalidId`
//!
//! ## Listings
//! - `test_find_all_empty` / `test_find_all_scoped_to_owner`
//! - `test_find_in_range_inclusive_bounds` — midnight and end-of-day are in
//! - `test_find_in_range_unbounded_equals_find_all`
//!
//! ## Conditional writes
//! - `test_update_one_*` — matched counts for present, absent, foreign and unchanged records
//! - `test_delete_one_*` — deleted counts, exactly one record removed
//!
//! ## Concurrency
//! - `test_concurrent_inserts` — parallel inserts from spawned tasks

/// Generate a full `TransactionStore` conformance test suite.
///
/// `$factory` must evaluate to a fresh, empty store implementing
/// `TransactionStore + Clone + 'static`; it is re-evaluated for each test.
/// `$missing_id` must evaluate to a well-formed id that is not stored.
#[macro_export]
macro_rules! store_contract_tests {
    ($factory:expr, $missing_id:expr) => {
        mod transaction_store_contract {
            use super::*;
            use chrono::Utc;
            use ledger::core::{StorageError, TimeFrame, TransactionStore};

            fn frame(start: Option<&str>, end: Option<&str>) -> TimeFrame {
                TimeFrame::resolve(start, end, Utc::now()).unwrap()
            }

            // ==================================================================
            // Insert & lookup
            // ==================================================================

            #[tokio::test]
            async fn test_insert_and_find_one() {
                let store = $factory;
                let mut record = tx("u-1", "coffee", 3.5, at(2024, 1, 1, 9, 0, 0));
                record.category = "food".to_string();

                let id = store.insert(&record).await.unwrap();
                assert!(!id.is_empty());

                let found = store.find_one(&id, "u-1").await.unwrap().unwrap();
                assert_eq!(found.id, id);
                assert_eq!(found.user_id, "u-1");
                assert_eq!(found.category, "food");
                assert_eq!(found.name, "coffee");
                assert_eq!(found.cost, 3.5);
                assert_eq!(found.date, at(2024, 1, 1, 9, 0, 0));
            }

            #[tokio::test]
            async fn test_insert_assigns_distinct_ids() {
                let store = $factory;
                let record = tx("u-1", "coffee", 3.5, at(2024, 1, 1, 9, 0, 0));

                let first = store.insert(&record).await.unwrap();
                let second = store.insert(&record).await.unwrap();
                assert_ne!(first, second);
            }

            #[tokio::test]
            async fn test_find_one_other_owner() {
                let store = $factory;
                let id = store
                    .insert(&tx("u-1", "coffee", 3.5, at(2024, 1, 1, 9, 0, 0)))
                    .await
                    .unwrap();

                assert!(store.find_one(&id, "u-2").await.unwrap().is_none());
            }

            #[tokio::test]
            async fn test_find_one_missing() {
                let store = $factory;
                let missing: String = $missing_id;
                assert!(store.find_one(&missing, "u-1").await.unwrap().is_none());
            }

            #[tokio::test]
            async fn test_find_one_malformed_id() {
                let store = $factory;
                let err = store.find_one("definitely not an id", "u-1").await.unwrap_err();
                assert!(matches!(err, StorageError::InvalidId { .. }));
                assert_eq!(err.to_string(), "invalid id: definitely not an id");
            }

            // ==================================================================
            // Listings
            // ==================================================================

            #[tokio::test]
            async fn test_find_all_empty() {
                let store = $factory;
                assert!(store.find_all("u-1").await.unwrap().is_empty());
            }

            #[tokio::test]
            async fn test_find_all_scoped_to_owner() {
                let store = $factory;
                for i in 0..3 {
                    store
                        .insert(&tx("u-1", &format!("mine-{}", i), 1.0, at(2024, 1, 1, 9, i, 0)))
                        .await
                        .unwrap();
                }
                store
                    .insert(&tx("u-2", "theirs", 1.0, at(2024, 1, 1, 9, 0, 0)))
                    .await
                    .unwrap();

                let mine = store.find_all("u-1").await.unwrap();
                assert_eq!(mine.len(), 3);
                assert!(mine.iter().all(|t| t.user_id == "u-1"));
            }

            #[tokio::test]
            async fn test_find_in_range_inclusive_bounds() {
                let store = $factory;
                let inside = [at(2024, 1, 1, 0, 0, 0), last_ms_of(2024, 1, 1)];
                let outside = [at(2023, 12, 31, 23, 59, 59), at(2024, 1, 2, 0, 0, 0)];
                for date in inside.iter().chain(outside.iter()) {
                    store.insert(&tx("u-1", "edge", 1.0, *date)).await.unwrap();
                }

                let found = store
                    .find_in_range("u-1", &frame(Some("2024-01-01"), Some("2024-01-01")))
                    .await
                    .unwrap();

                let mut dates: Vec<_> = found.iter().map(|t| t.date).collect();
                dates.sort();
                assert_eq!(dates, inside.to_vec());
            }

            #[tokio::test]
            async fn test_find_in_range_scoped_to_owner() {
                let store = $factory;
                store
                    .insert(&tx("u-2", "theirs", 1.0, at(2024, 1, 1, 12, 0, 0)))
                    .await
                    .unwrap();

                let found = store
                    .find_in_range("u-1", &frame(Some("2024-01-01"), Some("2024-01-01")))
                    .await
                    .unwrap();
                assert!(found.is_empty());
            }

            #[tokio::test]
            async fn test_find_in_range_unbounded_equals_find_all() {
                let store = $factory;
                for date in [at(1971, 6, 1, 0, 0, 0), at(2024, 1, 1, 0, 0, 0), at(2099, 1, 1, 0, 0, 0)] {
                    store.insert(&tx("u-1", "any", 1.0, date)).await.unwrap();
                }

                let mut all: Vec<String> =
                    store.find_all("u-1").await.unwrap().into_iter().map(|t| t.id).collect();
                let mut ranged: Vec<String> = store
                    .find_in_range("u-1", &frame(None, None))
                    .await
                    .unwrap()
                    .into_iter()
                    .map(|t| t.id)
                    .collect();
                all.sort();
                ranged.sort();
                assert_eq!(all.len(), 3);
                assert_eq!(all, ranged);
            }

            // ==================================================================
            // Conditional writes
            // ==================================================================

            #[tokio::test]
            async fn test_update_one_existing() {
                let store = $factory;
                let id = store
                    .insert(&tx("u-1", "coffee", 3.5, at(2024, 1, 1, 9, 0, 0)))
                    .await
                    .unwrap();

                let mut changed = store.find_one(&id, "u-1").await.unwrap().unwrap();
                changed.name = "tea".to_string();
                changed.cost = 2.0;
                changed.category = "drinks".to_string();
                changed.date = at(2024, 2, 2, 10, 30, 0);

                assert_eq!(store.update_one(&changed).await.unwrap(), 1);
                let stored = store.find_one(&id, "u-1").await.unwrap().unwrap();
                assert_eq!(stored, changed);
            }

            #[tokio::test]
            async fn test_update_one_unchanged_still_matches() {
                let store = $factory;
                let id = store
                    .insert(&tx("u-1", "coffee", 3.5, at(2024, 1, 1, 9, 0, 0)))
                    .await
                    .unwrap();

                let same = store.find_one(&id, "u-1").await.unwrap().unwrap();
                assert_eq!(store.update_one(&same).await.unwrap(), 1);
            }

            #[tokio::test]
            async fn test_update_one_missing() {
                let store = $factory;
                let mut ghost = tx("u-1", "ghost", 1.0, at(2024, 1, 1, 9, 0, 0));
                ghost.id = $missing_id;
                assert_eq!(store.update_one(&ghost).await.unwrap(), 0);
            }

            #[tokio::test]
            async fn test_update_one_other_owner() {
                let store = $factory;
                let id = store
                    .insert(&tx("u-1", "coffee", 3.5, at(2024, 1, 1, 9, 0, 0)))
                    .await
                    .unwrap();

                let mut foreign = store.find_one(&id, "u-1").await.unwrap().unwrap();
                foreign.user_id = "u-2".to_string();
                foreign.cost = 0.0;

                assert_eq!(store.update_one(&foreign).await.unwrap(), 0);
                let stored = store.find_one(&id, "u-1").await.unwrap().unwrap();
                assert_eq!(stored.cost, 3.5);
            }

            #[tokio::test]
            async fn test_delete_one_existing_removes_exactly_one() {
                let store = $factory;
                let keep = store
                    .insert(&tx("u-1", "keep", 1.0, at(2024, 1, 1, 9, 0, 0)))
                    .await
                    .unwrap();
                let drop = store
                    .insert(&tx("u-1", "drop", 1.0, at(2024, 1, 1, 9, 0, 0)))
                    .await
                    .unwrap();

                assert_eq!(store.delete_one(&drop, "u-1").await.unwrap(), 1);
                assert!(store.find_one(&drop, "u-1").await.unwrap().is_none());

                let remaining = store.find_all("u-1").await.unwrap();
                assert_eq!(remaining.len(), 1);
                assert_eq!(remaining[0].id, keep);

                assert_eq!(store.delete_one(&drop, "u-1").await.unwrap(), 0);
            }

            #[tokio::test]
            async fn test_delete_one_missing() {
                let store = $factory;
                let missing: String = $missing_id;
                assert_eq!(store.delete_one(&missing, "u-1").await.unwrap(), 0);
            }

            #[tokio::test]
            async fn test_delete_one_other_owner() {
                let store = $factory;
                let id = store
                    .insert(&tx("u-1", "coffee", 3.5, at(2024, 1, 1, 9, 0, 0)))
                    .await
                    .unwrap();

                assert_eq!(store.delete_one(&id, "u-2").await.unwrap(), 0);
                assert!(store.find_one(&id, "u-1").await.unwrap().is_some());
            }

            // ==================================================================
            // Concurrency
            // ==================================================================

            #[tokio::test]
            async fn test_concurrent_inserts() {
                let store = $factory;

                let mut handles = Vec::new();
                for i in 0..10 {
                    let store = store.clone();
                    handles.push(tokio::spawn(async move {
                        store
                            .insert(&tx("u-1", &format!("parallel-{}", i), 1.0, at(2024, 1, 1, 9, 0, 0)))
                            .await
                            .unwrap()
                    }));
                }

                let mut ids = Vec::new();
                for handle in handles {
                    ids.push(handle.await.unwrap());
                }
                ids.sort();
                ids.dedup();
                assert_eq!(ids.len(), 10);
                assert_eq!(store.find_all("u-1").await.unwrap().len(), 10);
            }
        }
    };
}
