pub mod transient;
pub mod voting_session;
