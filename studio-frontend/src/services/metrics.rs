//! Prometheus metrics for the studio front-end.

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::sync::OnceLock;

pub static REGISTRY: OnceLock<Registry> = OnceLock::new();
pub static HTTP_REQUESTS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();
pub static HTTP_REQUEST_DURATION_SECONDS: OnceLock<HistogramVec> = OnceLock::new();
pub static GENERATION_REQUESTS_TOTAL: OnceLock<IntCounterVec> = OnceLock::new();

/// Initialize the metrics registry. Safe to call more than once; later
/// calls are no-ops.
pub fn init_metrics() {
    let registry = Registry::new();

    let http_requests = IntCounterVec::new(
        Opts::new("http_requests_total", "Total number of HTTP requests"),
        &["method", "path", "status"],
    )
    .expect("Failed to create http_requests_total counter");
    registry
        .register(Box::new(http_requests.clone()))
        .expect("Failed to register http_requests_total");

    let http_duration = HistogramVec::new(
        HistogramOpts::new(
            "http_request_duration_seconds",
            "HTTP request latency in seconds",
        ),
        &["method", "path", "status"],
    )
    .expect("Failed to create http_request_duration_seconds histogram");
    registry
        .register(Box::new(http_duration.clone()))
        .expect("Failed to register http_request_duration_seconds");

    let generations = IntCounterVec::new(
        Opts::new(
            "generation_requests_total",
            "Generation operations by outcome",
        ),
        &["operation", "outcome"],
    )
    .expect("Failed to create generation_requests_total counter");
    registry
        .register(Box::new(generations.clone()))
        .expect("Failed to register generation_requests_total");

    let _ = HTTP_REQUESTS_TOTAL.set(http_requests);
    let _ = HTTP_REQUEST_DURATION_SECONDS.set(http_duration);
    let _ = GENERATION_REQUESTS_TOTAL.set(generations);
    let _ = REGISTRY.set(registry);
}

/// Render the registry in the Prometheus text exposition format.
pub fn get_metrics() -> String {
    let registry = REGISTRY.get().expect("Metrics registry not initialized");

    let mut buffer = Vec::new();
    let encoder = TextEncoder::new();
    encoder
        .encode(&registry.gather(), &mut buffer)
        .expect("Failed to encode metrics");

    String::from_utf8(buffer).unwrap_or_default()
}

/// Record one HTTP request observation.
pub fn observe_request(method: &str, path: &str, status: &str, seconds: f64) {
    if let Some(counter) = HTTP_REQUESTS_TOTAL.get() {
        counter.with_label_values(&[method, path, status]).inc();
    }
    if let Some(histogram) = HTTP_REQUEST_DURATION_SECONDS.get() {
        histogram
            .with_label_values(&[method, path, status])
            .observe(seconds);
    }
}

/// Record the outcome of a generation operation.
pub fn observe_generation(operation: &str, outcome: &str) {
    if let Some(counter) = GENERATION_REQUESTS_TOTAL.get() {
        counter.with_label_values(&[operation, outcome]).inc();
    }
}

/// Label for a generation result.
pub fn outcome<T, E>(result: &Result<T, E>) -> &'static str {
    if result.is_ok() {
        "ok"
    } else {
        "error"
    }
}
