//! Identity validator backed by a fixed user table

use crate::core::{IdentityError, IdentityValidator, UserIdentity};
use async_trait::async_trait;
use indexmap::IndexMap;
use std::sync::{Arc, RwLock};

/// Resolves users from an in-process table
///
/// Used by tests and by deployments that run without a user service. Users
/// can be added at runtime; removal is not supported.
#[derive(Clone, Default)]
pub struct StaticIdentityValidator {
    users: Arc<RwLock<IndexMap<String, String>>>,
}

impl StaticIdentityValidator {
    /// Create a validator that knows no users
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a validator from `(id, display_name)` pairs
    pub fn with_users<I, K, V>(users: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let users = users
            .into_iter()
            .map(|(id, name)| (id.into(), name.into()))
            .collect();
        Self {
            users: Arc::new(RwLock::new(users)),
        }
    }

    /// Register (or rename) a user
    pub fn add_user(
        &self,
        id: impl Into<String>,
        display_name: impl Into<String>,
    ) -> Result<(), IdentityError> {
        let mut users = self.users.write().map_err(|e| IdentityError::Unavailable {
            message: format!("Failed to acquire write lock: {}", e),
        })?;
        users.insert(id.into(), display_name.into());
        Ok(())
    }
}

#[async_trait]
impl IdentityValidator for StaticIdentityValidator {
    async fn resolve(&self, user_id: &str) -> Result<Option<UserIdentity>, IdentityError> {
        let users = self.users.read().map_err(|e| IdentityError::Unavailable {
            message: format!("Failed to acquire read lock: {}", e),
        })?;

        Ok(users
            .get(user_id)
            .map(|name| UserIdentity::new(user_id, name.clone())))
    }
}
