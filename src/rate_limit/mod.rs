pub mod limiter;
pub mod store;

pub use limiter::{RateLimitDecision, RateLimiter};
pub use store::{CounterStore, RedisCounterStore, StoreError};
