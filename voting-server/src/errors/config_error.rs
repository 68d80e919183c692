use thiserror::Error;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} has an invalid value: {value}")]
    Invalid { name: &'static str, value: String },
    #[error("{0} must be greater than zero")]
    Zero(&'static str),
}
