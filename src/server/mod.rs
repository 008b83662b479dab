//! Server module: protocol exposures and the builder that wires them
//!
//! The `ServerBuilder` assembles a `TransactionService` from a store and an
//! identity validator, then exposes it over:
//! - REST (always)
//! - gRPC on the same listener (feature `grpc`)

pub mod builder;
pub mod exposure;

pub use builder::ServerBuilder;
