use crate::{
    admission::{admission_middleware, AdmissionPipeline},
    api::{auth, health, tasks},
    auth::{AuthGate, TokenCodec},
    config::AuthConfig,
    domain::{TaskService, UserRepository},
    observability::{metrics::track_http_metrics, HealthChecker},
    rate_limit::RateLimiter,
};
use axum::{
    extract::FromRef,
    middleware::{from_fn, from_fn_with_state},
    routing::{delete, get, patch, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

#[derive(Clone)]
pub struct AppState {
    pub tasks: TaskService,
    pub users: Arc<dyn UserRepository>,
    pub token_codec: Arc<TokenCodec>,
    pub auth: AuthConfig,
    pub health_checker: Arc<HealthChecker>,
}

impl FromRef<AppState> for Arc<HealthChecker> {
    fn from_ref(state: &AppState) -> Self {
        state.health_checker.clone()
    }
}

/// Admission order for protected routes: throttle first, then authenticate
pub fn admission_pipeline(rate_limiter: RateLimiter, token_codec: Arc<TokenCodec>) -> AdmissionPipeline {
    AdmissionPipeline::new()
        .with_gate(Arc::new(rate_limiter))
        .with_gate(Arc::new(AuthGate::new(token_codec)))
}

pub fn create_router(state: AppState, admission: AdmissionPipeline) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health endpoints
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .route("/metrics", get(health::metrics))
        // Public auth endpoints
        .route("/auth/register", post(auth::register))
        .route("/auth/login", post(auth::login))
        // Protected task API
        .nest("/api/v1/tasks", task_routes(admission))
        .layer(CatchPanicLayer::new())
        .layer(from_fn(track_http_metrics))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

fn task_routes(admission: AdmissionPipeline) -> Router<AppState> {
    Router::new()
        .route("/", post(tasks::create).get(tasks::list))
        .route("/search", get(tasks::search))
        .route("/today", get(tasks::today))
        .route("/overdue", get(tasks::overdue))
        .route("/stats", get(tasks::stats))
        .route("/bulk-delete", post(tasks::bulk_delete))
        .route("/bulk-status", post(tasks::bulk_status))
        .route("/status/:status", get(tasks::by_status))
        .route("/priority/:priority", get(tasks::by_priority))
        .route("/tag/:tag", get(tasks::by_tag))
        .route(
            "/:id",
            get(tasks::get).put(tasks::update).delete(tasks::delete),
        )
        .route("/:id/status", patch(tasks::change_status))
        .route("/:id/priority", patch(tasks::change_priority))
        .route("/:id/archive", patch(tasks::archive))
        .route("/:id/unarchive", patch(tasks::unarchive))
        .route("/:id/tags", post(tasks::add_tag))
        .route("/:id/tags/:tag", delete(tasks::remove_tag))
        .route_layer(from_fn_with_state(Arc::new(admission), admission_middleware))
}
