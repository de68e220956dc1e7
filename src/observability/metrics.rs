//! Metrics collection and exposition.
//!
//! # Metrics
//! - `statuswatch_checks_total` (counter): checks by target and classification
//! - `statuswatch_check_latency_seconds` (histogram): measured latencies of UP/SLOW checks
//! - `statuswatch_alert_active` (gauge): 1=alerting, 0=quiet, per target
//! - `statuswatch_notifications_failed_total` (counter): failed deliveries by notifier
//! - `statuswatch_store_save_failures_total` (counter): snapshot writes that failed

use std::net::SocketAddr;

use metrics_exporter_prometheus::PrometheusBuilder;

use crate::health::classification::CheckRecord;

/// Install the Prometheus recorder and its HTTP listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_check(target: &str, record: &CheckRecord) {
    metrics::counter!(
        "statuswatch_checks_total",
        "target" => target.to_string(),
        "classification" => record.classification.as_str()
    )
    .increment(1);

    if record.classification.has_measured_latency() {
        metrics::histogram!("statuswatch_check_latency_seconds", "target" => target.to_string())
            .record(record.latency_secs);
    }
}

pub fn record_alert_state(target: &str, active: bool) {
    metrics::gauge!("statuswatch_alert_active", "target" => target.to_string())
        .set(if active { 1.0 } else { 0.0 });
}

pub fn record_notification_failure(notifier: &str) {
    metrics::counter!("statuswatch_notifications_failed_total", "notifier" => notifier.to_string())
        .increment(1);
}

pub fn record_store_save_failure() {
    metrics::counter!("statuswatch_store_save_failures_total").increment(1);
}
