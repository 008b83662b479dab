//! ServerBuilder for fluent API to build the ledger HTTP server

use super::exposure::RestExposure;
use crate::core::{IdentityValidator, TransactionService, TransactionStore};
use anyhow::{Result, anyhow};
use axum::Router;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Builder for the ledger server
///
/// # Example
///
/// ```ignore
/// let app = ServerBuilder::new()
///     .with_store(InMemoryTransactionStore::new())
///     .with_identity(StaticIdentityValidator::with_users([("u-1", "Ada")]))
///     .with_grpc(true)
///     .build()?;
/// ```
pub struct ServerBuilder {
    store: Option<Arc<dyn TransactionStore>>,
    identity: Option<Arc<dyn IdentityValidator>>,
    grpc: bool,
}

impl ServerBuilder {
    /// Create a new ServerBuilder
    pub fn new() -> Self {
        Self {
            store: None,
            identity: None,
            grpc: false,
        }
    }

    /// Set the transaction store (required)
    pub fn with_store(self, store: impl TransactionStore + 'static) -> Self {
        self.with_shared_store(Arc::new(store))
    }

    /// Set an already shared transaction store
    pub fn with_shared_store(mut self, store: Arc<dyn TransactionStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Set the identity validator (required)
    pub fn with_identity(self, identity: impl IdentityValidator + 'static) -> Self {
        self.with_shared_identity(Arc::new(identity))
    }

    /// Set an already shared identity validator
    pub fn with_shared_identity(mut self, identity: Arc<dyn IdentityValidator>) -> Self {
        self.identity = Some(identity);
        self
    }

    /// Mount the gRPC service on the same router
    ///
    /// Building fails when this is enabled without the `grpc` feature.
    pub fn with_grpc(mut self, enabled: bool) -> Self {
        self.grpc = enabled;
        self
    }

    /// Build the transaction service from the configured collaborators
    pub fn build_service(&self) -> Result<TransactionService> {
        let store = self
            .store
            .clone()
            .ok_or_else(|| anyhow!("Transaction store is required. Call .with_store() first."))?;
        let identity = self.identity.clone().ok_or_else(|| {
            anyhow!("Identity validator is required. Call .with_identity() first.")
        })?;

        Ok(TransactionService::new(store, identity))
    }

    /// Build the final router
    ///
    /// REST routes are always present; gRPC routes are merged in when
    /// enabled. Every request is traced.
    pub fn build(self) -> Result<Router> {
        let service = self.build_service()?;

        let mut app = RestExposure::build_router(service.clone());

        if self.grpc {
            app = app.merge(Self::grpc_router(service)?);
        }

        Ok(app.layer(TraceLayer::new_for_http()))
    }

    #[cfg(feature = "grpc")]
    fn grpc_router(service: TransactionService) -> Result<Router> {
        Ok(super::exposure::GrpcExposure::build_router(service))
    }

    #[cfg(not(feature = "grpc"))]
    fn grpc_router(_service: TransactionService) -> Result<Router> {
        Err(anyhow!("gRPC exposure requires the 'grpc' feature"))
    }

    /// Serve the application with graceful shutdown
    ///
    /// This will:
    /// - Bind to the provided address
    /// - Start serving requests (REST, plus gRPC when enabled)
    /// - Handle SIGTERM and SIGINT (Ctrl+C) for graceful shutdown
    pub async fn serve(self, addr: &str) -> Result<()> {
        let grpc = self.grpc;
        let app = self.build()?;
        let listener = TcpListener::bind(addr).await?;

        if grpc {
            tracing::info!("Server listening on {} (REST + gRPC)", addr);
        } else {
            tracing::info!("Server listening on {}", addr);
        }

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Wait for shutdown signal (SIGTERM or Ctrl+C)
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, initiating graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, initiating graceful shutdown...");
        },
    }
}
