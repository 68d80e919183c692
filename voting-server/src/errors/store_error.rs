use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Session {0} not found")]
    NotFound(String),
    #[error("Stored session {id} is malformed: {source}")]
    Malformed {
        id: String,
        source: serde_json::Error,
    },
    #[error("Could not serialize session: {0}")]
    Serialize(serde_json::Error),
    #[error("Key-value store error: {0}")]
    Backend(String),
}
