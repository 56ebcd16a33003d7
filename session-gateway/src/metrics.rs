//! Gateway metrics

use prometheus::{
    register_counter_vec, register_histogram_vec, CounterVec, HistogramVec,
};

lazy_static::lazy_static! {
    /// Total gateway requests by operation and outcome
    pub static ref GATEWAY_REQUESTS_TOTAL: CounterVec = register_counter_vec!(
        "consent_gateway_requests_total",
        "Total gateway requests",
        &["operation", "outcome"]
    )
    .unwrap();

    /// Gateway request duration by operation
    pub static ref GATEWAY_REQUEST_DURATION: HistogramVec = register_histogram_vec!(
        "consent_gateway_request_duration_seconds",
        "Gateway request duration",
        &["operation"]
    )
    .unwrap();

    /// Automatic login retries taken on transient silent-auth failures
    pub static ref LOGIN_RETRIES_TOTAL: CounterVec = register_counter_vec!(
        "consent_gateway_login_retries_total",
        "Automatic login retries on transient silent-auth failures",
        &["outcome"]
    )
    .unwrap();
}
