//! API exposure modules for the ledger
//!
//! Each exposure wraps a [`TransactionService`](crate::core::TransactionService)
//! and produces an axum `Router` for its protocol.

pub mod rest;

pub use rest::RestExposure;

#[cfg(feature = "grpc")]
pub mod grpc;

#[cfg(feature = "grpc")]
pub use grpc::GrpcExposure;
