//! Core module containing the domain types, collaborator traits and the
//! transaction service

pub mod datetime;
pub mod error;
pub mod identity;
pub mod service;
pub mod store;
pub mod transaction;

pub use datetime::{DATE_FORMAT, DATE_TIME_FORMAT, TIME_FORMAT, TimeFrame};
pub use error::{
    ErrorResponse, IdentityError, LedgerError, LedgerResult, NotFoundError, StorageError,
    ValidationError,
};
pub use identity::IdentityValidator;
pub use service::TransactionService;
pub use store::{StoreResult, TransactionStore};
pub use transaction::{
    DEFAULT_CATEGORY, DateRange, NewTransaction, Transaction, TransactionPatch, UserIdentity,
};
