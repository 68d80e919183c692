use crate::errors::config_error::ConfigError;
use std::{env, net::SocketAddr, str::FromStr, time::Duration};

const DEFAULT_HTTP_ADDRESS: &str = "0.0.0.0:8080";
const DEFAULT_IDENTITY_URL: &str = "http://localhost:50051";
const DEFAULT_REDIS_URL: &str = "redis://localhost:6379";
const DEFAULT_AUTH_TIMEOUT_MS: u64 = 1000;
const DEFAULT_SUBSCRIBER_QUEUE: usize = 64;

#[derive(Debug, Clone)]
pub struct Config {
    pub http_address: SocketAddr,
    pub identity_url: String,
    pub redis_url: String,
    pub auth_timeout: Duration,
    pub subscriber_queue: usize,
}

impl Config {
    /// Reads the configuration from the process environment. Call
    /// `dotenvy::dotenv()` first to pick up a `.env` file.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let http_address = parse_or(&lookup, "HTTP_ADDRESS", || {
            SocketAddr::from_str(DEFAULT_HTTP_ADDRESS).ok()
        })?;

        let identity_url = lookup("IDENTITY_URL").unwrap_or(DEFAULT_IDENTITY_URL.to_string());
        if !identity_url.starts_with("http://") && !identity_url.starts_with("https://") {
            return Err(ConfigError::Invalid {
                name: "IDENTITY_URL",
                value: identity_url,
            });
        }

        let redis_url = lookup("REDIS_URL").unwrap_or(DEFAULT_REDIS_URL.to_string());
        if !redis_url.starts_with("redis://") && !redis_url.starts_with("rediss://") {
            return Err(ConfigError::Invalid {
                name: "REDIS_URL",
                value: redis_url,
            });
        }

        let auth_timeout_ms: u64 =
            parse_or(&lookup, "AUTH_TIMEOUT_MS", || Some(DEFAULT_AUTH_TIMEOUT_MS))?;
        if auth_timeout_ms == 0 {
            return Err(ConfigError::Zero("AUTH_TIMEOUT_MS"));
        }

        let subscriber_queue: usize =
            parse_or(&lookup, "SUBSCRIBER_QUEUE", || Some(DEFAULT_SUBSCRIBER_QUEUE))?;
        if subscriber_queue == 0 {
            return Err(ConfigError::Zero("SUBSCRIBER_QUEUE"));
        }

        Ok(Config {
            http_address,
            identity_url,
            redis_url,
            auth_timeout: Duration::from_millis(auth_timeout_ms),
            subscriber_queue,
        })
    }
}

fn parse_or<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
    default: impl FnOnce() -> Option<T>,
) -> Result<T, ConfigError> {
    match lookup(name) {
        Some(value) => value
            .trim()
            .parse()
            .or(Err(ConfigError::Invalid { name, value })),
        None => default().ok_or(ConfigError::Invalid {
            name,
            value: String::new(),
        }),
    }
}
