use axum::http::StatusCode;
use once_cell::sync::Lazy;
use prometheus::{register_int_counter, register_int_counter_vec, Encoder, IntCounter, IntCounterVec, TextEncoder};

// Prometheus metrics (default registry)
pub static REQUEST_TRANSITIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "home_services_request_transitions_total",
        "Service request lifecycle transitions by action",
        &["action"]
    )
    .expect("register request_transitions_total")
});

pub static LOGINS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!("home_services_logins_total", "Successful logins")
        .expect("register logins_total")
});

pub static LOGIN_FAILURES_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!("home_services_login_failures_total", "Rejected login attempts")
        .expect("register login_failures_total")
});

pub static REVIEWS_TOTAL: Lazy<IntCounter> = Lazy::new(|| {
    register_int_counter!("home_services_reviews_total", "Submitted reviews")
        .expect("register reviews_total")
});

/// `created`, `accepted`, `closed`, `cancelled`.
pub fn transition(action: &str) {
    REQUEST_TRANSITIONS_TOTAL.with_label_values(&[action]).inc();
}

pub fn encode_metrics() -> (StatusCode, String) {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        return (StatusCode::INTERNAL_SERVER_ERROR, format!("metrics encode error: {e}"));
    }
    (StatusCode::OK, String::from_utf8(buffer).unwrap_or_default())
}

pub async fn metrics_handler() -> (StatusCode, String) {
    encode_metrics()
}
