// Shared counter ledger backing the rate limiter

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("counter store error: {0}")]
    Backend(#[from] redis::RedisError),
    #[error("counter store did not answer within {0:?}")]
    Timeout(Duration),
}

/// Key-value store with an atomic increment-and-expire primitive
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Increment `key` and (re)set its time-to-live to `ttl` in one atomic
    /// step, returning the post-increment count.
    async fn increment_and_expire(&self, key: &str, ttl: Duration) -> Result<u64, StoreError>;

    /// Cheap liveness probe
    async fn ping(&self) -> Result<(), StoreError>;
}

/// Redis implementation using a MULTI/EXEC transaction
#[derive(Clone)]
pub struct RedisCounterStore {
    manager: ConnectionManager,
    timeout: Duration,
}

impl RedisCounterStore {
    /// `timeout` bounds every round trip; exceeding it is reported as an error
    pub fn new(manager: ConnectionManager, timeout: Duration) -> Self {
        Self { manager, timeout }
    }
}

#[async_trait]
impl CounterStore for RedisCounterStore {
    async fn increment_and_expire(&self, key: &str, ttl: Duration) -> Result<u64, StoreError> {
        // Connection managers are cheap handles onto one multiplexed connection
        let mut conn = self.manager.clone();

        // EXPIRE runs on every request, so the window restarts each time
        let mut pipe = redis::pipe();
        pipe.atomic()
            .cmd("INCR")
            .arg(key)
            .cmd("EXPIRE")
            .arg(key)
            .arg(ttl.as_secs())
            .ignore();

        let (count,): (u64,) = tokio::time::timeout(self.timeout, pipe.query_async(&mut conn))
            .await
            .map_err(|_| StoreError::Timeout(self.timeout))??;

        Ok(count)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        let mut conn = self.manager.clone();
        let _: String = tokio::time::timeout(self.timeout, redis::cmd("PING").query_async(&mut conn))
            .await
            .map_err(|_| StoreError::Timeout(self.timeout))??;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn create_store() -> RedisCounterStore {
        let config = crate::config::RedisConfig {
            url: "redis://localhost:6379".to_string(),
            connection_timeout_seconds: 5,
        };
        let manager = crate::redis::create_client(&config).await.unwrap();
        RedisCounterStore::new(manager, Duration::from_millis(500))
    }

    #[tokio::test]
    #[ignore] // Requires Redis
    async fn test_increment_sets_ttl() {
        let store = create_store().await;
        let key = "rate_limit_test_increment_sets_ttl";

        let mut conn = store.manager.clone();
        let _: () = redis::cmd("DEL").arg(key).query_async(&mut conn).await.unwrap();

        assert_eq!(store.increment_and_expire(key, Duration::from_secs(60)).await.unwrap(), 1);
        assert_eq!(store.increment_and_expire(key, Duration::from_secs(60)).await.unwrap(), 2);

        let ttl: i64 = redis::cmd("TTL").arg(key).query_async(&mut conn).await.unwrap();
        assert!(ttl > 0 && ttl <= 60);

        let _: () = redis::cmd("DEL").arg(key).query_async(&mut conn).await.unwrap();
    }

    #[tokio::test]
    #[ignore] // Requires Redis
    async fn test_counter_resets_after_ttl() {
        let store = create_store().await;
        let key = "rate_limit_test_counter_resets";

        store.increment_and_expire(key, Duration::from_secs(1)).await.unwrap();
        tokio::time::sleep(Duration::from_millis(2100)).await;

        assert_eq!(store.increment_and_expire(key, Duration::from_secs(1)).await.unwrap(), 1);
    }

    #[tokio::test]
    #[ignore] // Requires Redis
    async fn test_ping() {
        let store = create_store().await;
        assert!(store.ping().await.is_ok());
    }
}
