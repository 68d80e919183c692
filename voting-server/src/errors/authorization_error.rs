use std::time::Duration;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuthorizationError {
    #[error("Missing authorization header")]
    MissingHeader,
    #[error("Authorization header is not a bearer credential")]
    MalformedHeader,
    #[error("Identity service denied the credential")]
    Denied,
    #[error("Identity service call failed: {0}")]
    Remote(tonic::Status),
    #[error("Identity service did not answer within {0:?}")]
    Timeout(Duration),
}
