//! Identity validation contract

use super::error::IdentityError;
use super::transaction::UserIdentity;
use async_trait::async_trait;

/// Resolves user identifiers against the user service
///
/// `Ok(None)` means the user does not exist; it is a regular outcome, not an
/// error. Errors are reserved for the identity service itself failing.
#[async_trait]
pub trait IdentityValidator: Send + Sync {
    async fn resolve(&self, user_id: &str) -> Result<Option<UserIdentity>, IdentityError>;
}
