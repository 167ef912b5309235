use crate::admission::{Gate, GateOutcome};
use crate::config::RateLimitConfig;
use crate::errors::AppError;
use crate::observability::MetricsRecorder;
use crate::rate_limit::store::CounterStore;
use async_trait::async_trait;
use axum::{
    extract::{ConnectInfo, Request},
    http::{HeaderMap, HeaderName, HeaderValue},
    response::IntoResponse,
};
use std::net::SocketAddr;
use std::sync::Arc;

const KEY_PREFIX: &str = "rate_limit_";

pub const X_RATELIMIT_LIMIT: HeaderName = HeaderName::from_static("x-ratelimit-limit");
pub const X_RATELIMIT_REMAINING: HeaderName = HeaderName::from_static("x-ratelimit-remaining");

/// Outcome of counting one request against its client's window
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitDecision {
    pub allowed: bool,
    pub limit: u64,
    pub remaining: u64,
    pub current: u64,
}

impl RateLimitDecision {
    fn from_count(current: u64, limit: u64) -> Self {
        let allowed = current <= limit;
        Self {
            allowed,
            limit,
            remaining: if allowed { limit - current } else { 0 },
            current,
        }
    }

    /// `X-RateLimit-*` headers describing this decision
    pub fn headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(X_RATELIMIT_LIMIT, HeaderValue::from(self.limit));
        headers.insert(X_RATELIMIT_REMAINING, HeaderValue::from(self.remaining));
        headers
    }
}

/// Fixed-size window limiter keyed by the client's network address.
///
/// Every request increments the client's counter and pushes its expiry out by
/// one window, so a client that never pauses for a full window stays limited.
pub struct RateLimiter {
    store: Arc<dyn CounterStore>,
    config: RateLimitConfig,
}

impl RateLimiter {
    pub fn new(store: Arc<dyn CounterStore>, config: RateLimitConfig) -> Self {
        Self { store, config }
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Ledger key for a client address
    pub fn key_for(address: &str) -> String {
        format!("{}{}", KEY_PREFIX, address)
    }

    /// Count one request from `address` and decide whether it may proceed
    pub async fn check(&self, address: &str) -> Result<RateLimitDecision, AppError> {
        let key = Self::key_for(address);

        let current = self
            .store
            .increment_and_expire(&key, self.config.window())
            .await
            .map_err(|e| {
                tracing::error!(key = %key, error = %e, "Rate limit store unavailable");
                MetricsRecorder::record_store_failure();
                AppError::StoreUnavailable
            })?;

        let decision = RateLimitDecision::from_count(current, self.config.limit);

        tracing::debug!(
            key = %key,
            current = decision.current,
            remaining = decision.remaining,
            allowed = decision.allowed,
            "Rate limit check"
        );

        Ok(decision)
    }
}

/// Remote address of the connection, without the port
fn client_address(request: &Request) -> String {
    request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

#[async_trait]
impl Gate for RateLimiter {
    fn name(&self) -> &'static str {
        "rate_limit"
    }

    async fn admit(&self, request: &mut Request) -> GateOutcome {
        if !self.config.enabled {
            return GateOutcome::pass();
        }

        let address = client_address(request);

        match self.check(&address).await {
            Ok(decision) if decision.allowed => {
                MetricsRecorder::record_rate_limit_decision("allowed");
                GateOutcome::Continue(decision.headers())
            }
            Ok(decision) => {
                tracing::info!(
                    client = %address,
                    limit = decision.limit,
                    current = decision.current,
                    "Rate limit exceeded"
                );
                MetricsRecorder::record_rate_limit_decision("rejected");

                let mut response =
                    AppError::RateLimitExceeded(self.config.error_message.clone()).into_response();
                response.headers_mut().extend(decision.headers());
                GateOutcome::Reject(response)
            }
            Err(e) => GateOutcome::Reject(e.into_response()),
        }
    }
}
