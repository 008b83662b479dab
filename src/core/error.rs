//! Typed error handling for the ledger
//!
//! Every service operation returns a [`LedgerError`] so that protocol adapters
//! can map failures to transport-level codes without string matching.
//!
//! # Error Categories
//!
//! - [`ValidationError`]: malformed or rejected input (`InvalidArgument`)
//! - [`NotFoundError`]: missing user or transaction
//! - [`StorageError`]: anything the transaction store reports besides "absent"
//! - [`IdentityError`]: anything the identity service reports besides "absent"
//! - `ConcurrentModification`: an update matched no record at write time
//!
//! # Example
//!
//! ```rust,ignore
//! match service.get(&tx_id, &user_id).await {
//!     Ok(Some(tx)) => println!("{}: {}", tx.name, tx.cost),
//!     Ok(None) => println!("no such transaction"),
//!     Err(LedgerError::NotFound(NotFoundError::User { user_id })) => {
//!         println!("unknown user {}", user_id);
//!     }
//!     Err(e) => eprintln!("error: {}", e),
//! }
//! ```

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use std::fmt;

/// The main error type for ledger operations
#[derive(Debug)]
pub enum LedgerError {
    /// Input was rejected before reaching any collaborator
    InvalidArgument(ValidationError),

    /// The owning user or the target transaction does not exist
    NotFound(NotFoundError),

    /// Transaction store failure, propagated unchanged
    Storage(StorageError),

    /// Identity service failure, propagated unchanged
    Identity(IdentityError),

    /// The record vanished between read and write
    ConcurrentModification { transaction_id: String },
}

impl fmt::Display for LedgerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LedgerError::InvalidArgument(e) => write!(f, "{}", e),
            LedgerError::NotFound(e) => write!(f, "{}", e),
            LedgerError::Storage(e) => write!(f, "{}", e),
            LedgerError::Identity(e) => write!(f, "{}", e),
            LedgerError::ConcurrentModification { transaction_id } => {
                write!(f, "update did not apply to transaction '{}'", transaction_id)
            }
        }
    }
}

impl std::error::Error for LedgerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LedgerError::InvalidArgument(e) => Some(e),
            LedgerError::NotFound(e) => Some(e),
            LedgerError::Storage(e) => Some(e),
            LedgerError::Identity(e) => Some(e),
            LedgerError::ConcurrentModification { .. } => None,
        }
    }
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl LedgerError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            LedgerError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            LedgerError::NotFound(_) => StatusCode::NOT_FOUND,
            LedgerError::Storage(StorageError::InvalidId { .. }) => StatusCode::BAD_REQUEST,
            LedgerError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
            LedgerError::Identity(_) => StatusCode::BAD_GATEWAY,
            LedgerError::ConcurrentModification { .. } => StatusCode::CONFLICT,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            LedgerError::InvalidArgument(e) => e.error_code(),
            LedgerError::NotFound(NotFoundError::User { .. }) => "USER_NOT_FOUND",
            LedgerError::NotFound(NotFoundError::Transaction { .. }) => "TRANSACTION_NOT_FOUND",
            LedgerError::Storage(StorageError::InvalidId { .. }) => "INVALID_ID",
            LedgerError::Storage(_) => "STORAGE_ERROR",
            LedgerError::Identity(_) => "IDENTITY_ERROR",
            LedgerError::ConcurrentModification { .. } => "CONCURRENT_MODIFICATION",
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details: self.details(),
        }
    }

    /// Shorthand for the "user not found" outcome of an identity check
    pub fn user_not_found(user_id: impl Into<String>) -> Self {
        LedgerError::NotFound(NotFoundError::User {
            user_id: user_id.into(),
        })
    }

    /// Shorthand for a transaction missing for its owner
    pub fn transaction_not_found(id: impl Into<String>, user_id: impl Into<String>) -> Self {
        LedgerError::NotFound(NotFoundError::Transaction {
            id: id.into(),
            user_id: user_id.into(),
        })
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            LedgerError::NotFound(NotFoundError::Transaction { id, user_id }) => {
                Some(serde_json::json!({ "id": id, "user_id": user_id }))
            }
            LedgerError::NotFound(NotFoundError::User { user_id }) => {
                Some(serde_json::json!({ "user_id": user_id }))
            }
            LedgerError::InvalidArgument(ValidationError::InvalidFormat {
                field, expected, ..
            }) => Some(serde_json::json!({ "field": field, "expected": expected })),
            _ => None,
        }
    }
}

impl IntoResponse for LedgerError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// Input rejected by the service before any store access
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("cost cannot be below 0 (got {cost})")]
    NegativeCost { cost: f64 },

    #[error("field '{field}' is required")]
    MissingField { field: String },

    #[error("invalid {field} '{value}': expected format {expected}")]
    InvalidFormat {
        field: String,
        value: String,
        expected: String,
    },

    #[error("no changes requested")]
    NoChanges,
}

impl ValidationError {
    pub fn error_code(&self) -> &'static str {
        match self {
            ValidationError::NegativeCost { .. } => "NEGATIVE_COST",
            ValidationError::MissingField { .. } => "MISSING_FIELD",
            ValidationError::InvalidFormat { .. } => "INVALID_FORMAT",
            ValidationError::NoChanges => "NO_CHANGES",
        }
    }
}

impl From<ValidationError> for LedgerError {
    fn from(err: ValidationError) -> Self {
        LedgerError::InvalidArgument(err)
    }
}

// =============================================================================
// Not Found Errors
// =============================================================================

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NotFoundError {
    #[error("user '{user_id}' not found")]
    User { user_id: String },

    #[error("transaction '{id}' not found for user '{user_id}'")]
    Transaction { id: String, user_id: String },
}

impl From<NotFoundError> for LedgerError {
    fn from(err: NotFoundError) -> Self {
        LedgerError::NotFound(err)
    }
}

// =============================================================================
// Storage Errors
// =============================================================================

/// Errors reported by a transaction store
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The identifier is not in the store's id format
    #[error("invalid id: {id}")]
    InvalidId { id: String },

    /// Connection error
    #[error("failed to connect to {backend}: {message}")]
    Connection { backend: String, message: String },

    /// Query execution error
    #[error("{backend} query error: {message}")]
    Query { backend: String, message: String },

    /// Stored data could not be decoded into a transaction
    #[error("data integrity error: {message}")]
    Integrity { message: String },
}

impl From<StorageError> for LedgerError {
    fn from(err: StorageError) -> Self {
        LedgerError::Storage(err)
    }
}

// =============================================================================
// Identity Errors
// =============================================================================

/// Errors reported by the identity service (other than "user absent")
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    /// The identity service could not be reached
    #[error("identity service unavailable: {message}")]
    Unavailable { message: String },

    /// The identity service answered with an error
    #[error("identity service error ({code}): {message}")]
    Upstream { code: String, message: String },
}

impl From<IdentityError> for LedgerError {
    fn from(err: IdentityError) -> Self {
        LedgerError::Identity(err)
    }
}

// =============================================================================
// Result type alias
// =============================================================================

/// A specialized Result type for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;
