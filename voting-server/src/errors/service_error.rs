use crate::errors::{
    authorization_error::AuthorizationError, store_error::StoreError, vote_error::VoteError,
};
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use log::{error, warn};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Session not found")]
    NotFound,
    #[error("User has already voted")]
    AlreadyVoted,
    #[error("Malformed input: {0}")]
    MalformedInput(String),
    #[error("Storage failure: {0}")]
    StorageFailure(StoreError),
    #[error("Login failed")]
    LoginFailed,
    #[error("Registration failed")]
    RegistrationFailed,
    #[error("Logout failed")]
    LogoutFailed,
}

impl ServiceError {
    pub fn status(&self) -> StatusCode {
        match self {
            ServiceError::Unauthorized | ServiceError::LoginFailed | ServiceError::LogoutFailed => {
                StatusCode::UNAUTHORIZED
            }
            ServiceError::NotFound => StatusCode::NOT_FOUND,
            ServiceError::AlreadyVoted => StatusCode::CONFLICT,
            ServiceError::MalformedInput(_) => StatusCode::BAD_REQUEST,
            ServiceError::StorageFailure(_) | ServiceError::RegistrationFailed => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<AuthorizationError> for ServiceError {
    fn from(error: AuthorizationError) -> Self {
        warn!("Rejected credential: {error}");
        ServiceError::Unauthorized
    }
}

impl From<VoteError> for ServiceError {
    fn from(error: VoteError) -> Self {
        match error {
            VoteError::SessionNotFound(_) => ServiceError::NotFound,
            VoteError::AlreadyVoted(_) => ServiceError::AlreadyVoted,
            VoteError::Storage(error) => ServiceError::StorageFailure(error),
        }
    }
}

impl From<StoreError> for ServiceError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::NotFound(_) | StoreError::Malformed { .. } => ServiceError::NotFound,
            error => ServiceError::StorageFailure(error),
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match self {
            ServiceError::StorageFailure(ref error) => {
                error!("{error}");
                String::from("Internal server error")
            }
            ref error => error.to_string(),
        };

        (
            status,
            Json(json!({ "status": status.as_u16(), "message": message })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vote_errors_map_to_http_classes() {
        assert_eq!(
            ServiceError::from(VoteError::SessionNotFound("x".to_string())).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ServiceError::from(VoteError::AlreadyVoted("alice".to_string())).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ServiceError::from(VoteError::Storage(StoreError::Backend("down".to_string())))
                .status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn malformed_stored_session_reads_as_not_found() {
        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let error = ServiceError::from(StoreError::Malformed {
            id: "x".to_string(),
            source,
        });

        assert!(matches!(error, ServiceError::NotFound));
    }

    #[test]
    fn every_authorization_failure_is_unauthorized() {
        for error in [
            AuthorizationError::MissingHeader,
            AuthorizationError::MalformedHeader,
            AuthorizationError::Denied,
            AuthorizationError::Remote(tonic::Status::unavailable("down")),
        ] {
            assert_eq!(ServiceError::from(error).status(), StatusCode::UNAUTHORIZED);
        }
    }
}
