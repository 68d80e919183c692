use crate::models::transient::authenticated_identity::AuthenticatedIdentity;
use async_trait::async_trait;
use tonic::Status;

pub mod grpc_identity;
mod proto;

/// Remote account and token service. Every call is a single round trip; the
/// caller bounds it with a timeout.
#[async_trait]
pub trait IdentityService: Send + Sync {
    async fn login(&self, username: &str, password: &str) -> Result<String, Status>;

    async fn register(&self, username: &str, password: &str) -> Result<String, Status>;

    async fn log_out(&self, username: &str, auth_code: &str) -> Result<String, Status>;

    async fn check_authorized(&self, auth_code: &str) -> Result<AuthenticatedIdentity, Status>;
}
