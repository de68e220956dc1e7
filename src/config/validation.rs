//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check target URLs are absolute http(s) URLs and unique
//! - Validate value ranges (timeouts > 0, thresholds and sizes >= 1)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: MonitorConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::config::schema::MonitorConfig;

/// A single semantic problem in the configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("no targets configured")]
    NoTargets,

    #[error("target {url:?} is not a valid http(s) URL: {reason}")]
    InvalidTargetUrl { url: String, reason: String },

    #[error("target {0:?} is configured more than once")]
    DuplicateTarget(String),

    #[error("target {0:?} has an empty keyword")]
    EmptyKeyword(String),

    #[error("{field} must be a positive number of seconds, got {value}")]
    NonPositiveDuration { field: &'static str, value: f64 },

    #[error("{field} is too large to be a duration, got {value} seconds")]
    DurationOutOfRange { field: &'static str, value: f64 },

    #[error("{0} must be at least 1")]
    ZeroValue(&'static str),

    #[error("webhook {url:?} is not a valid http(s) URL: {reason}")]
    InvalidWebhookUrl { url: String, reason: String },

    #[error("metrics address {0:?} is not a socket address")]
    InvalidMetricsAddress(String),
}

/// Validate a parsed configuration.
pub fn validate_config(config: &MonitorConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.targets.is_empty() {
        errors.push(ValidationError::NoTargets);
    }

    let mut seen = HashSet::new();
    for target in &config.targets {
        if let Err(reason) = check_http_url(&target.url) {
            errors.push(ValidationError::InvalidTargetUrl {
                url: target.url.clone(),
                reason,
            });
        }
        if !seen.insert(target.url.as_str()) {
            errors.push(ValidationError::DuplicateTarget(target.url.clone()));
        }
        if target.keyword.as_deref() == Some("") {
            errors.push(ValidationError::EmptyKeyword(target.url.clone()));
        }
    }

    for (field, value) in [
        ("probe.timeout_secs", config.probe.timeout_secs),
        ("probe.slow_threshold_secs", config.probe.slow_threshold_secs),
    ] {
        if !(value.is_finite() && value > 0.0) {
            errors.push(ValidationError::NonPositiveDuration { field, value });
        } else if Duration::try_from_secs_f64(value).is_err() {
            errors.push(ValidationError::DurationOutOfRange { field, value });
        }
    }

    if config.probe.slow_threshold_secs >= config.probe.timeout_secs {
        tracing::warn!(
            slow_threshold_secs = config.probe.slow_threshold_secs,
            timeout_secs = config.probe.timeout_secs,
            "Slow threshold is not below the timeout; SLOW will never be reported"
        );
    }

    let counts = [
        ("alert.enter_threshold", config.alert.enter_threshold as u64),
        ("alert.exit_threshold", config.alert.exit_threshold as u64),
        ("retention.window_size", config.retention.window_size as u64),
        ("retention.history_size", config.retention.history_size as u64),
        ("schedule.interval_secs", config.schedule.interval_secs),
    ];
    for (field, value) in counts {
        if value == 0 {
            errors.push(ValidationError::ZeroValue(field));
        }
    }

    for hook in &config.notifications.webhooks {
        if let Err(reason) = check_http_url(&hook.url) {
            errors.push(ValidationError::InvalidWebhookUrl {
                url: hook.url.clone(),
                reason,
            });
        }
        if hook.timeout_secs == 0 {
            errors.push(ValidationError::ZeroValue("notifications.webhooks.timeout_secs"));
        }
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_http_url(raw: &str) -> Result<(), String> {
    let url = Url::parse(raw).map_err(|e| e.to_string())?;
    match url.scheme() {
        "http" | "https" => {}
        other => return Err(format!("unsupported scheme {other:?}")),
    }
    if url.host_str().is_none() {
        return Err("missing host".to_string());
    }
    Ok(())
}
