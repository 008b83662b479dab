//! Identity validator that asks the user service over gRPC
//!
//! Calls `user.UserService/GetUser`. The user service reports a missing user
//! either with a `NOT_FOUND` status or with an empty id in an OK response;
//! both resolve to `None`. Any other failure is an [`IdentityError`].

use crate::core::{IdentityError, IdentityValidator, UserIdentity};
use crate::proto::user::GetUserRequest;
use crate::proto::user::user_service_client::UserServiceClient;
use async_trait::async_trait;
use tonic::Code;
use tonic::transport::{Channel, Endpoint};

/// gRPC client for the user service
///
/// The channel connects lazily, so the ledger can start before the user
/// service is reachable; the first failing call reports `Unavailable`.
#[derive(Clone, Debug)]
pub struct GrpcIdentityClient {
    client: UserServiceClient<Channel>,
}

impl GrpcIdentityClient {
    /// Create a client for `endpoint`, e.g. `http://users:50051`
    pub fn new(endpoint: impl Into<String>) -> Result<Self, IdentityError> {
        let endpoint = endpoint.into();
        let channel = Endpoint::from_shared(endpoint.clone())
            .map_err(|e| IdentityError::Unavailable {
                message: format!("invalid endpoint '{}': {}", endpoint, e),
            })?
            .connect_lazy();

        Ok(Self::from_channel(channel))
    }

    /// Wrap an existing channel
    pub fn from_channel(channel: Channel) -> Self {
        Self {
            client: UserServiceClient::new(channel),
        }
    }
}

fn status_to_error(status: tonic::Status) -> IdentityError {
    match status.code() {
        Code::Unavailable | Code::DeadlineExceeded | Code::Cancelled => {
            IdentityError::Unavailable {
                message: status.message().to_string(),
            }
        }
        code => IdentityError::Upstream {
            code: format!("{:?}", code),
            message: status.message().to_string(),
        },
    }
}

#[async_trait]
impl IdentityValidator for GrpcIdentityClient {
    async fn resolve(&self, user_id: &str) -> Result<Option<UserIdentity>, IdentityError> {
        let request = GetUserRequest {
            user_id: user_id.to_string(),
        };

        // Clients are cheap clones sharing the channel; calls need `&mut self`
        let mut client = self.client.clone();
        match client.get_user(request).await {
            Ok(response) => {
                let user = response.into_inner();
                if user.id.is_empty() {
                    return Ok(None);
                }
                Ok(Some(UserIdentity::new(user.id, user.name)))
            }
            Err(status) if status.code() == Code::NotFound => Ok(None),
            Err(status) => {
                tracing::debug!(user_id, code = ?status.code(), "user service call failed");
                Err(status_to_error(status))
            }
        }
    }
}
