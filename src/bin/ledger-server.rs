//! Ledger server entry point
//!
//! Loads the YAML configuration (if any), applies environment and CLI
//! overrides, then serves REST (and gRPC when enabled) until Ctrl+C/SIGTERM.

use anyhow::Result;
use clap::Parser;
use ledger::config::{IdentityConfig, LedgerConfig, StorageConfig};
use ledger::core::{IdentityValidator, TransactionStore};
use ledger::identity::StaticIdentityValidator;
use ledger::server::ServerBuilder;
use ledger::storage::InMemoryTransactionStore;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(name = "ledger-server")]
#[command(about = "Transaction ledger service (REST + gRPC)", long_about = None)]
struct Cli {
    /// Path to the YAML configuration file
    #[arg(short, long, env = "LEDGER_CONFIG")]
    config: Option<String>,

    /// Listen address, overrides `server.bind`
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => LedgerConfig::from_yaml_file(path)?,
        None => LedgerConfig::default(),
    };
    config.apply_env_overrides();
    if let Some(bind) = cli.bind {
        config.server.bind = bind;
    }
    config.validate()?;

    // Setup logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| config.log.filter.clone().into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let store = build_store(&config.storage).await?;
    let identity = build_identity(&config.identity)?;

    ServerBuilder::new()
        .with_shared_store(store)
        .with_shared_identity(identity)
        .with_grpc(config.server.grpc)
        .serve(&config.server.bind)
        .await
}

async fn build_store(config: &StorageConfig) -> Result<Arc<dyn TransactionStore>> {
    match config {
        StorageConfig::Memory => {
            tracing::info!("Using in-memory transaction store");
            Ok(Arc::new(InMemoryTransactionStore::new()))
        }
        #[cfg(feature = "mongodb_backend")]
        StorageConfig::Mongodb {
            uri,
            database,
            collection,
        } => {
            let store = ledger::storage::MongoTransactionStore::connect(uri, database)
                .await?
                .with_collection(collection);
            store.ensure_indexes().await?;
            tracing::info!(database, collection, "Using MongoDB transaction store");
            Ok(Arc::new(store))
        }
        #[cfg(not(feature = "mongodb_backend"))]
        StorageConfig::Mongodb { .. } => {
            anyhow::bail!("mongodb storage requires the 'mongodb_backend' feature")
        }
    }
}

fn build_identity(config: &IdentityConfig) -> Result<Arc<dyn IdentityValidator>> {
    match config {
        IdentityConfig::Static { users } => {
            tracing::info!(users = users.len(), "Using static identity table");
            Ok(Arc::new(StaticIdentityValidator::with_users(users.clone())))
        }
        #[cfg(feature = "grpc")]
        IdentityConfig::Grpc { endpoint } => {
            tracing::info!(endpoint, "Using user service for identity checks");
            Ok(Arc::new(ledger::identity::GrpcIdentityClient::new(endpoint.clone())?))
        }
        #[cfg(not(feature = "grpc"))]
        IdentityConfig::Grpc { .. } => {
            anyhow::bail!("grpc identity requires the 'grpc' feature")
        }
    }
}
