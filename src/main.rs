use std::{net::SocketAddr, sync::Arc};
use taskflow::{
    api::{admission_pipeline, create_router, AppState},
    auth::TokenCodec,
    config::Config,
    db::{create_pool, run_migrations, PostgresTaskRepository, PostgresUserRepository},
    domain::TaskService,
    observability::{init_tracing, HealthChecker},
    rate_limit::{CounterStore, RateLimiter, RedisCounterStore},
    redis::create_client,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load()?;
    config.validate()?;

    init_tracing(&config.observability);

    tracing::info!("Starting taskflow service");
    tracing::info!(server = ?config.server, rate_limit = ?config.rate_limit, "Configuration loaded");

    let db_pool = create_pool(&config.database).await?;
    run_migrations(&db_pool).await?;

    let redis_manager = create_client(&config.redis).await?;
    let counter_store: Arc<dyn CounterStore> = Arc::new(RedisCounterStore::new(
        redis_manager,
        config.rate_limit.store_timeout(),
    ));

    let token_codec = Arc::new(TokenCodec::from_config(&config.auth));
    let rate_limiter = RateLimiter::new(counter_store.clone(), config.rate_limit.clone());

    let state = AppState {
        tasks: TaskService::new(Arc::new(PostgresTaskRepository::new(db_pool.clone()))),
        users: Arc::new(PostgresUserRepository::new(db_pool.clone())),
        token_codec: token_codec.clone(),
        auth: config.auth.clone(),
        health_checker: Arc::new(HealthChecker::new(db_pool, counter_store)),
    };

    let app = create_router(state, admission_pipeline(rate_limiter, token_codec));

    let addr: SocketAddr = format!("{}:{}", config.server.host, config.server.port).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{}", addr);

    // The limiter keys on the peer address, so connection info must be attached
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .map_err(|e| anyhow::anyhow!("Server error: {}", e))?;

    tracing::info!("Server stopped");

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        return;
    }
    tracing::info!("Shutdown signal received");
}
