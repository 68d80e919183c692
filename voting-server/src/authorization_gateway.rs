use crate::{errors::authorization_error::AuthorizationError, identity::IdentityService};
use log::{trace, warn};
use std::{future::Future, sync::Arc, time::Duration};
use tonic::Status;

const BEARER_PREFIX: &str = "Bearer ";

/// Extracts the token from an `Authorization` header value.
pub fn bearer_token(header: Option<&str>) -> Result<&str, AuthorizationError> {
    let header = header.ok_or(AuthorizationError::MissingHeader)?;
    let token = header
        .strip_prefix(BEARER_PREFIX)
        .ok_or(AuthorizationError::MalformedHeader)?
        .trim();

    if token.is_empty() {
        return Err(AuthorizationError::MalformedHeader);
    }

    Ok(token)
}

/// Front door to the identity service. Every remote call is bounded by the
/// configured timeout and is never retried.
pub struct AuthorizationGateway {
    identity: Arc<dyn IdentityService>,
    timeout: Duration,
}

impl AuthorizationGateway {
    pub fn new(identity: Arc<dyn IdentityService>, timeout: Duration) -> Self {
        AuthorizationGateway { identity, timeout }
    }

    /// Resolves a bearer credential to the username it belongs to.
    pub async fn authorize(&self, credential: Option<&str>) -> Result<String, AuthorizationError> {
        let token = bearer_token(credential)?;
        let identity = self.bounded(self.identity.check_authorized(token)).await?;

        if !identity.authorized || identity.username.is_empty() {
            return Err(AuthorizationError::Denied);
        }

        trace!("Authorized {}", identity.username);
        Ok(identity.username)
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<String, AuthorizationError> {
        self.bounded(self.identity.login(username, password)).await
    }

    pub async fn register(
        &self,
        username: &str,
        password: &str,
    ) -> Result<String, AuthorizationError> {
        self.bounded(self.identity.register(username, password))
            .await
    }

    pub async fn log_out(
        &self,
        username: &str,
        credential: Option<&str>,
    ) -> Result<String, AuthorizationError> {
        let token = bearer_token(credential)?;
        self.bounded(self.identity.log_out(username, token)).await
    }

    async fn bounded<T>(
        &self,
        call: impl Future<Output = Result<T, Status>>,
    ) -> Result<T, AuthorizationError> {
        match tokio::time::timeout(self.timeout, call).await {
            Ok(Ok(value)) => Ok(value),
            Ok(Err(status)) => {
                warn!("gRPC identity call failed: {status}");
                Err(AuthorizationError::Remote(status))
            }
            Err(_) => {
                warn!("gRPC identity call timed out after {:?}", self.timeout);
                Err(AuthorizationError::Timeout(self.timeout))
            }
        }
    }
}
