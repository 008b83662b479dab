//! Configuration loading and management
//!
//! The server reads one YAML document:
//!
//! ```yaml
//! server:
//!   bind: 0.0.0.0:8080
//!   grpc: true
//! storage:
//!   kind: mongodb
//!   uri: mongodb://localhost:27017
//!   database: moneykeeper
//!   collection: transactions
//! identity:
//!   kind: grpc
//!   endpoint: http://users:50051
//! log:
//!   filter: info,ledger=debug
//! ```
//!
//! Every section is optional. A handful of environment variables override the
//! file (see [`LedgerConfig::apply_env_overrides`]).

use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::net::{SocketAddr, ToSocketAddrs};

pub const ENV_BIND_ADDR: &str = "LEDGER_BIND_ADDR";
pub const ENV_MONGODB_URI: &str = "LEDGER_MONGODB_URI";
pub const ENV_USER_SERVICE_URL: &str = "LEDGER_USER_SERVICE_URL";
pub const ENV_LOG: &str = "LEDGER_LOG";

/// Complete configuration of the ledger server
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub identity: IdentityConfig,
    pub log: LogConfig,
}

/// Listener settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address shared by REST and gRPC
    pub bind: String,

    /// Mount the gRPC service next to REST (requires the `grpc` feature)
    pub grpc: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "127.0.0.1:8080".to_string(),
            grpc: false,
        }
    }
}

/// Where transactions are kept
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum StorageConfig {
    #[default]
    Memory,
    Mongodb {
        uri: String,
        #[serde(default = "default_database")]
        database: String,
        #[serde(default = "default_collection")]
        collection: String,
    },
}

fn default_database() -> String {
    "moneykeeper".to_string()
}

fn default_collection() -> String {
    "transactions".to_string()
}

/// How user ids are validated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum IdentityConfig {
    /// Fixed table of user id to display name
    Static {
        #[serde(default)]
        users: BTreeMap<String, String>,
    },
    /// Remote `user.UserService`
    Grpc { endpoint: String },
}

impl Default for IdentityConfig {
    fn default() -> Self {
        IdentityConfig::Static {
            users: BTreeMap::new(),
        }
    }
}

/// Tracing filter used when `RUST_LOG` is not set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    pub filter: String,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
        }
    }
}

impl LedgerConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        Ok(config)
    }

    /// Apply overrides from the process environment
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from an arbitrary lookup
    ///
    /// A MongoDB URI switches storage to MongoDB (keeping database and
    /// collection names if already configured); a user service URL switches
    /// identity to gRPC.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(bind) = lookup(ENV_BIND_ADDR) {
            self.server.bind = bind;
        }

        if let Some(uri) = lookup(ENV_MONGODB_URI) {
            self.storage = match std::mem::take(&mut self.storage) {
                StorageConfig::Mongodb {
                    database,
                    collection,
                    ..
                } => StorageConfig::Mongodb {
                    uri,
                    database,
                    collection,
                },
                StorageConfig::Memory => StorageConfig::Mongodb {
                    uri,
                    database: default_database(),
                    collection: default_collection(),
                },
            };
        }

        if let Some(endpoint) = lookup(ENV_USER_SERVICE_URL) {
            self.identity = IdentityConfig::Grpc { endpoint };
        }

        if let Some(filter) = lookup(ENV_LOG) {
            self.log.filter = filter;
        }
    }

    /// Resolved bind address
    ///
    /// Host names are accepted (`localhost:8080`); the first resolved
    /// address is returned.
    pub fn bind_addr(&self) -> Result<SocketAddr> {
        let bind = &self.server.bind;
        bind.to_socket_addrs()
            .map_err(|e| anyhow::anyhow!("invalid bind address '{}': {}", bind, e))?
            .next()
            .ok_or_else(|| anyhow::anyhow!("bind address '{}' resolved to nothing", bind))
    }

    /// Check the configuration for values the server cannot start with
    pub fn validate(&self) -> Result<()> {
        self.bind_addr()?;

        if let StorageConfig::Mongodb {
            uri,
            database,
            collection,
        } = &self.storage
        {
            if uri.is_empty() {
                bail!("storage.uri must not be empty");
            }
            if database.is_empty() || collection.is_empty() {
                bail!("storage.database and storage.collection must not be empty");
            }
            if cfg!(not(feature = "mongodb_backend")) {
                bail!("mongodb storage requires the 'mongodb_backend' feature");
            }
        }

        if let IdentityConfig::Grpc { endpoint } = &self.identity {
            if endpoint.is_empty() {
                bail!("identity.endpoint must not be empty");
            }
            if cfg!(not(feature = "grpc")) {
                bail!("grpc identity requires the 'grpc' feature");
            }
        }

        if self.server.grpc && cfg!(not(feature = "grpc")) {
            bail!("server.grpc requires the 'grpc' feature");
        }

        Ok(())
    }
}
