use crate::errors::store_error::StoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum VoteError {
    #[error("Session {0} not found")]
    SessionNotFound(String),
    #[error("{0} has already voted")]
    AlreadyVoted(String),
    #[error("Could not persist vote: {0}")]
    Storage(#[from] StoreError),
}
