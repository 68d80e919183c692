use super::key_value_store::KeyValueStore;
use crate::errors::store_error::StoreError;
use async_trait::async_trait;
use log::info;
use redis::{AsyncCommands, RedisError, aio::ConnectionManager};

pub struct RedisStore {
    connection: ConnectionManager,
}

impl RedisStore {
    /// Connects and pings the server so a bad `REDIS_URL` fails at start-up.
    pub async fn connect(url: &str) -> Result<Self, RedisError> {
        let client = redis::Client::open(url)?;
        let mut connection = ConnectionManager::new(client).await?;
        let _: String = redis::cmd("PING").query_async(&mut connection).await?;

        info!("Connected to Redis at {url}");
        Ok(RedisStore { connection })
    }
}

#[async_trait]
impl KeyValueStore for RedisStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        let mut connection = self.connection.clone();
        connection
            .get(key)
            .await
            .map_err(|error| StoreError::Backend(error.to_string()))
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StoreError> {
        let mut connection = self.connection.clone();
        let _: () = connection
            .set(key, value)
            .await
            .map_err(|error| StoreError::Backend(error.to_string()))?;
        Ok(())
    }
}
