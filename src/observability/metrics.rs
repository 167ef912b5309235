use axum::{extract::Request, middleware::Next, response::Response};
use once_cell::sync::Lazy;
use prometheus::{
    register_histogram_vec, register_int_counter, register_int_counter_vec, HistogramVec,
    IntCounter, IntCounterVec, TextEncoder,
};
use std::time::Instant;

// Metrics registry
static HTTP_REQUESTS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "http_requests_total",
        "Total number of HTTP requests",
        &["method", "status"]
    )
    .unwrap()
});

static HTTP_REQUEST_DURATION: Lazy<HistogramVec> = Lazy::new(|| {
    register_histogram_vec!(
        "http_request_duration_seconds",
        "HTTP request latency in seconds",
        &["method"],
        vec![0.001, 0.005, 0.010, 0.050, 0.100, 0.500, 1.0, 5.0]
    )
    .unwrap()
});

static RATE_LIMIT_DECISIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "rate_limit_decisions_total",
        "Rate limiter decisions by outcome",
        &["decision"]
    )
    .unwrap()
});

static RATE_LIMIT_STORE_FAILURES_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!(
        "rate_limit_store_failures_total",
        "Counter store errors and timeouts seen by the rate limiter"
    )
    .unwrap()
});

static AUTH_REJECTIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "auth_rejections_total",
        "Requests refused by the bearer token gate",
        &["reason"]
    )
    .unwrap()
});

static LOGINS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!("logins_total", "Login attempts by outcome", &["outcome"]).unwrap()
});

pub struct MetricsRecorder;

impl MetricsRecorder {
    pub fn record_http_request(method: &str, status: u16) {
        HTTP_REQUESTS_TOTAL
            .with_label_values(&[method, &status.to_string()])
            .inc();
    }

    pub fn record_http_duration(method: &str, duration: f64) {
        HTTP_REQUEST_DURATION
            .with_label_values(&[method])
            .observe(duration);
    }

    /// `decision` is "allowed" or "rejected"
    pub fn record_rate_limit_decision(decision: &str) {
        RATE_LIMIT_DECISIONS_TOTAL
            .with_label_values(&[decision])
            .inc();
    }

    pub fn record_store_failure() {
        RATE_LIMIT_STORE_FAILURES_TOTAL.inc();
    }

    pub fn record_auth_rejection(reason: &str) {
        AUTH_REJECTIONS_TOTAL.with_label_values(&[reason]).inc();
    }

    pub fn record_login(outcome: &str) {
        LOGINS_TOTAL.with_label_values(&[outcome]).inc();
    }

    /// Export all metrics in Prometheus format
    pub fn export() -> Result<String, prometheus::Error> {
        let encoder = TextEncoder::new();
        let metric_families = prometheus::gather();
        encoder.encode_to_string(&metric_families)
    }
}

/// Axum middleware counting every response by method and status, with latency
pub async fn track_http_metrics(request: Request, next: Next) -> Response {
    let method = request.method().as_str().to_owned();
    let start = Instant::now();

    let response = next.run(request).await;

    MetricsRecorder::record_http_request(&method, response.status().as_u16());
    MetricsRecorder::record_http_duration(&method, start.elapsed().as_secs_f64());
    response
}
