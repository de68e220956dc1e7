//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the monitor.
//! All types derive Serde traits for deserialization from config files.

use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration for the status monitor.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct MonitorConfig {
    /// Endpoints to check on every pass.
    pub targets: Vec<TargetConfig>,

    /// Probe timing.
    pub probe: ProbeConfig,

    /// Alert hysteresis thresholds.
    pub alert: AlertConfig,

    /// Rolling window and history sizes.
    pub retention: RetentionConfig,

    /// Where the state snapshot lives.
    pub store: StoreConfig,

    /// Loop mode spacing.
    pub schedule: ScheduleConfig,

    /// Transition notifications.
    pub notifications: NotificationConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// A monitored endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TargetConfig {
    /// Full URL; also the key of the target in the state snapshot.
    pub url: String,

    /// Text the response body must contain to count as healthy.
    #[serde(default)]
    pub keyword: Option<String>,

    /// Display name for logs and the CLI.
    #[serde(default)]
    pub name: Option<String>,
}

impl TargetConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            keyword: None,
            name: None,
        }
    }

    pub fn with_keyword(mut self, keyword: impl Into<String>) -> Self {
        self.keyword = Some(keyword.into());
        self
    }

    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.url)
    }
}

/// Probe configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ProbeConfig {
    /// Whole-request deadline in seconds.
    pub timeout_secs: f64,

    /// Responses slower than this are classified SLOW.
    pub slow_threshold_secs: f64,

    /// User-Agent header sent with every probe.
    pub user_agent: String,

    /// Probe all targets of a pass concurrently.
    pub concurrent: bool,
}

impl ProbeConfig {
    pub fn timeout(&self) -> Duration {
        secs_or_default("probe.timeout_secs", self.timeout_secs, Duration::from_secs(15))
    }

    pub fn slow_threshold(&self) -> Duration {
        secs_or_default("probe.slow_threshold_secs", self.slow_threshold_secs, Duration::from_secs(2))
    }
}

/// Convert fractional seconds, falling back to `default` for values validation would reject.
fn secs_or_default(field: &'static str, value: f64, default: Duration) -> Duration {
    match Duration::try_from_secs_f64(value) {
        Ok(d) if !d.is_zero() => d,
        _ => {
            tracing::warn!(
                field,
                value,
                default_secs = default.as_secs_f64(),
                "Duration out of range, using default"
            );
            default
        }
    }
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 15.0,
            slow_threshold_secs: 2.0,
            user_agent: concat!("statuswatch/", env!("CARGO_PKG_VERSION")).to_string(),
            concurrent: true,
        }
    }
}

/// Alert hysteresis configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct AlertConfig {
    /// Consecutive degraded checks before the alert turns on.
    pub enter_threshold: u32,

    /// Consecutive UP checks before the alert turns off.
    pub exit_threshold: u32,
}

impl Default for AlertConfig {
    fn default() -> Self {
        Self {
            enter_threshold: 2,
            exit_threshold: 3,
        }
    }
}

/// Retention of per-target samples.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RetentionConfig {
    /// Latency samples kept for the rolling average.
    pub window_size: usize,

    /// Check records kept in the history.
    pub history_size: usize,
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            window_size: 3,
            history_size: 100,
        }
    }
}

/// State store configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Path of the JSON snapshot.
    pub path: PathBuf,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("status.json"),
        }
    }
}

/// Loop mode configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ScheduleConfig {
    /// Seconds between the start of consecutive passes.
    pub interval_secs: u64,
}

impl ScheduleConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs.max(1))
    }
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self { interval_secs: 300 }
    }
}

/// Notification configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NotificationConfig {
    /// Log every transition event.
    pub log: bool,

    /// Webhooks receiving transition events as JSON.
    pub webhooks: Vec<WebhookConfig>,
}

impl Default for NotificationConfig {
    fn default() -> Self {
        Self {
            log: true,
            webhooks: Vec::new(),
        }
    }
}

/// A webhook endpoint.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct WebhookConfig {
    pub url: String,

    /// Only deliver events where the alert flag flipped.
    #[serde(default)]
    pub alerts_only: bool,

    /// Delivery timeout in seconds.
    #[serde(default = "default_webhook_timeout")]
    pub timeout_secs: u64,
}

fn default_webhook_timeout() -> u64 {
    10
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Emit logs as JSON lines.
    pub json_logs: bool,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            json_logs: false,
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = MonitorConfig::default();
        assert!(config.targets.is_empty());
        assert_eq!(config.probe.timeout(), Duration::from_secs(15));
        assert_eq!(config.probe.slow_threshold(), Duration::from_secs(2));
        assert_eq!(config.alert.enter_threshold, 2);
        assert_eq!(config.alert.exit_threshold, 3);
        assert_eq!(config.retention.window_size, 3);
        assert_eq!(config.retention.history_size, 100);
        assert!(config.notifications.log);
    }

    #[test]
    fn test_minimal_toml() {
        let config: MonitorConfig = toml::from_str(
            r#"
            [[targets]]
            url = "https://example.com/"
            keyword = "Sign in"

            [alert]
            exit_threshold = 5
            "#,
        )
        .unwrap();

        assert_eq!(config.targets.len(), 1);
        assert_eq!(config.targets[0].keyword.as_deref(), Some("Sign in"));
        assert_eq!(config.alert.enter_threshold, 2);
        assert_eq!(config.alert.exit_threshold, 5);
        assert_eq!(config.store.path, PathBuf::from("status.json"));
    }

    #[test]
    fn test_webhook_defaults() {
        let config: MonitorConfig = toml::from_str(
            r#"
            [[notifications.webhooks]]
            url = "https://hooks.example.com/x"
            "#,
        )
        .unwrap();
        let hook = &config.notifications.webhooks[0];
        assert!(!hook.alerts_only);
        assert_eq!(hook.timeout_secs, 10);
    }

    #[test]
    fn test_invalid_timeout_falls_back() {
        let probe = ProbeConfig {
            timeout_secs: -1.0,
            ..Default::default()
        };
        assert_eq!(probe.timeout(), Duration::from_secs(15));
    }

    #[test]
    fn test_huge_timeout_falls_back() {
        let probe = ProbeConfig {
            timeout_secs: 1e30,
            slow_threshold_secs: 0.0,
            ..Default::default()
        };
        assert_eq!(probe.timeout(), Duration::from_secs(15));
        assert_eq!(probe.slow_threshold(), Duration::from_secs(2));
    }
}
