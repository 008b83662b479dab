//! gRPC API exposure for the ledger
//!
//! Serves `transaction.TransactionService` (see `proto/transaction.proto`).
//! The service is mounted into an axum router on its own path prefix so it
//! shares a listener with the REST routes without taking over their
//! fallback.

pub mod transaction_service;

mod convert;

pub use convert::error_to_status;

use crate::core::TransactionService;
use crate::proto::transaction::transaction_service_server::TransactionServiceServer;
use axum::Router;
use tonic::server::NamedService;

/// gRPC API exposure implementation
///
/// # Example
///
/// ```rust,ignore
/// let rest_router = RestExposure::build_router(service.clone());
/// let grpc_router = GrpcExposure::build_router(service);
///
/// // Merge both routers to serve on the same port
/// let app = rest_router.merge(grpc_router);
/// ```
pub struct GrpcExposure;

impl GrpcExposure {
    /// Build a router that only answers `/transaction.TransactionService/*`
    pub fn build_router(service: TransactionService) -> Router {
        let server = TransactionServiceServer::new(transaction_service::TransactionServiceImpl::new(
            service,
        ));
        let path = format!(
            "/{}/{{*method}}",
            <TransactionServiceServer<transaction_service::TransactionServiceImpl> as NamedService>::NAME
        );

        Router::new().route_service(&path, server)
    }
}
