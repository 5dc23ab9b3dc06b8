//! Prometheus metrics definitions and text rendering

use prometheus::{register_counter_vec, CounterVec, Encoder, TextEncoder};
use tracing::error;

lazy_static::lazy_static! {
    /// Total number of API requests issued by builders
    pub static ref API_REQUESTS: CounterVec = register_counter_vec!(
        "kube_resource_builders_api_requests_total",
        "Total number of API requests issued by builders",
        &["kind", "verb"]
    ).unwrap();

    /// Total number of API requests that returned an error
    pub static ref API_REQUEST_ERRORS: CounterVec = register_counter_vec!(
        "kube_resource_builders_api_request_errors_total",
        "Total number of API requests that returned an error",
        &["kind", "verb"]
    ).unwrap();
}

/// Count one round trip against the API server
pub fn record<T, E>(kind: &str, verb: &str, result: &Result<T, E>) {
    API_REQUESTS.with_label_values(&[kind, verb]).inc();
    if result.is_err() {
        API_REQUEST_ERRORS.with_label_values(&[kind, verb]).inc();
    }
}

/// Encode the default registry in the Prometheus text format
pub fn render() -> String {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        error!("Failed to encode metrics: {}", e);
        return String::new();
    }

    String::from_utf8(buffer).unwrap_or_default()
}
