use crate::rate_limit::CounterStore;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checks: Option<HealthChecks>,
}

impl HealthStatus {
    pub fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthChecks {
    pub database: ComponentStatus,
    pub counter_store: ComponentStatus,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComponentStatus {
    pub status: String,
    pub message: Option<String>,
}

impl ComponentStatus {
    fn ok() -> Self {
        Self {
            status: "ok".to_string(),
            message: None,
        }
    }

    fn error(message: String) -> Self {
        Self {
            status: "error".to_string(),
            message: Some(message),
        }
    }
}

pub struct HealthChecker {
    db_pool: PgPool,
    counter_store: Arc<dyn CounterStore>,
}

impl HealthChecker {
    pub fn new(db_pool: PgPool, counter_store: Arc<dyn CounterStore>) -> Self {
        Self {
            db_pool,
            counter_store,
        }
    }

    /// Liveness check - is the process up?
    pub fn liveness(&self) -> HealthStatus {
        HealthStatus {
            status: "ok".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            checks: None,
        }
    }

    /// Readiness check - are the database and the counter store reachable?
    pub async fn readiness(&self) -> HealthStatus {
        let (database, counter_store) = tokio::join!(self.check_database(), self.check_store());

        let status = if database.status == "ok" && counter_store.status == "ok" {
            "ok"
        } else {
            "degraded"
        };

        HealthStatus {
            status: status.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            checks: Some(HealthChecks {
                database,
                counter_store,
            }),
        }
    }

    async fn check_database(&self) -> ComponentStatus {
        match crate::db::health_check(&self.db_pool).await {
            Ok(_) => ComponentStatus::ok(),
            Err(e) => ComponentStatus::error(format!("Database check failed: {}", e)),
        }
    }

    async fn check_store(&self) -> ComponentStatus {
        match self.counter_store.ping().await {
            Ok(_) => ComponentStatus::ok(),
            Err(e) => ComponentStatus::error(format!("Counter store check failed: {}", e)),
        }
    }
}
