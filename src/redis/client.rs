use crate::{
    config::RedisConfig,
    errors::{AppError, Result},
};
use redis::{aio::ConnectionManager, Client};
use std::time::Duration;

/// Create a Redis client and connection manager
pub async fn create_client(config: &RedisConfig) -> Result<ConnectionManager> {
    tracing::info!("Creating Redis client");

    let client = Client::open(config.url.as_str())?;

    let timeout = Duration::from_secs(config.connection_timeout_seconds);
    let manager = tokio::time::timeout(timeout, ConnectionManager::new(client))
        .await
        .map_err(|_| {
            AppError::Configuration(format!(
                "Redis did not accept a connection within {}s",
                config.connection_timeout_seconds
            ))
        })??;

    tracing::info!("Redis client connected");

    Ok(manager)
}
