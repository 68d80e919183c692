pub mod authorization_error;
pub mod config_error;
pub mod service_error;
pub mod store_error;
pub mod vote_error;
