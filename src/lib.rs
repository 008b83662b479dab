//! # tx-ledger
//!
//! A transaction ledger service: records monetary transactions per user,
//! lists them (optionally within a range of calendar days), updates and
//! deletes them. Every operation first confirms the owning user with an
//! identity service.
//!
//! ## Features
//!
//! - **Transaction Service**: validation, category defaulting and date/time
//!   composition on top of two pluggable collaborators
//! - **Pluggable Storage**: in-memory store, MongoDB (`mongodb_backend`)
//! - **Pluggable Identity**: static user table, remote user service (`grpc`)
//! - **REST + gRPC**: both exposures share one listener
//! - **Configuration-Based**: YAML file with environment overrides
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use ledger::prelude::*;
//!
//! let service = TransactionService::new(
//!     Arc::new(InMemoryTransactionStore::new()),
//!     Arc::new(StaticIdentityValidator::with_users([("u-1", "Ada")])),
//! );
//!
//! let id = service
//!     .create(NewTransaction::new("u-1", "coffee", 3.5).with_category("food"))
//!     .await?;
//! let patched = service
//!     .update(TransactionPatch::new(&id, "u-1").cost(4.0).time("08:30"))
//!     .await?;
//! ```

pub mod config;
pub mod core;
pub mod identity;
#[cfg(feature = "grpc")]
pub mod proto;
pub mod server;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        DateRange, IdentityValidator, LedgerError, LedgerResult, NewTransaction, TimeFrame,
        Transaction, TransactionPatch, TransactionService, TransactionStore, UserIdentity,
    };

    // === Storage ===
    pub use crate::storage::InMemoryTransactionStore;
    #[cfg(feature = "mongodb_backend")]
    pub use crate::storage::MongoTransactionStore;

    // === Identity ===
    #[cfg(feature = "grpc")]
    pub use crate::identity::GrpcIdentityClient;
    pub use crate::identity::StaticIdentityValidator;

    // === Config ===
    pub use crate::config::{IdentityConfig, LedgerConfig, StorageConfig};

    // === Server ===
    pub use crate::server::ServerBuilder;

    // === External dependencies ===
    pub use async_trait::async_trait;
    pub use chrono::{DateTime, Utc};
    pub use std::sync::Arc;
}
