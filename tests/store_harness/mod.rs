//! Shared test harness for transaction store testing
//!
//! Provides fixture builders and the `store_contract_tests!` macro that
//! validates any `TransactionStore` implementation.
//!
//! # Usage
//!
//! From any integration test file in `tests/`:
//! ```rust,ignore
//! #[macro_use]
//! mod store_harness;
//! use store_harness::*;
//! ```

#![allow(dead_code)]

#[macro_use]
pub mod store_contract_tests;

use chrono::{DateTime, Duration, TimeZone, Utc};
use ledger::core::Transaction;

/// UTC instant with whole seconds
pub fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, mo, d, h, mi, s).unwrap()
}

/// Last millisecond of a day; every backend stores at least millisecond precision
pub fn last_ms_of(y: i32, mo: u32, d: u32) -> DateTime<Utc> {
    at(y, mo, d, 23, 59, 59) + Duration::milliseconds(999)
}

/// An unsaved transaction for `user_id`
pub fn tx(user_id: &str, name: &str, cost: f64, date: DateTime<Utc>) -> Transaction {
    Transaction::unsaved(user_id, "other", name, cost, date)
}
