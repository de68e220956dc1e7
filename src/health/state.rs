//! Per-target health state.
//!
//! # Responsibilities
//! - Hold everything persisted about one target between passes
//! - Apply a new check through the hysteresis tracker, latency window and history ledger
//! - Report whether the classification or alert flag changed
//!
//! # Design Decisions
//! - Every field has a default so partially written entries still load
//! - Derived values (rolling average, valid sample count) are stored so consumers never recompute them
//! - Bounds are re-applied on every update, so an oversized entry on disk shrinks on the next pass

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::config::{AlertConfig, MonitorConfig};
use crate::health::classification::{CheckRecord, Classification};
use crate::health::history::HistoryLedger;
use crate::health::hysteresis::{AlertChange, HysteresisTracker};
use crate::health::window::LatencyWindow;

/// Limits and thresholds applied when updating a target.
#[derive(Debug, Clone)]
pub struct StatePolicy {
    pub alert: AlertConfig,
    pub window_size: usize,
    pub history_size: usize,
    /// Upper bound for valid latency samples.
    pub timeout: std::time::Duration,
}

impl StatePolicy {
    pub fn from_config(config: &MonitorConfig) -> Self {
        Self {
            alert: config.alert.clone(),
            window_size: config.retention.window_size,
            history_size: config.retention.history_size,
            timeout: config.probe.timeout(),
        }
    }
}

impl Default for StatePolicy {
    fn default() -> Self {
        Self::from_config(&MonitorConfig::default())
    }
}

/// Durable state of one monitored target.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetState {
    pub classification: Classification,
    pub stable_streak: u32,
    pub degraded_streak: u32,
    pub alert_active: bool,
    pub last_check: Option<DateTime<Utc>>,
    pub last_latency_secs: f64,
    pub last_detail: Option<String>,
    /// Rolling latency window, oldest first. Failures are stored as `0.0`.
    pub recent_latencies: Vec<f64>,
    pub average_latency_secs: f64,
    pub valid_samples: usize,
    /// Check history, oldest first.
    pub history: Vec<CheckRecord>,
}

/// What changed when a check was applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StateChange {
    pub previous: Classification,
    pub current: Classification,
    pub alert: AlertChange,
}

impl StateChange {
    /// True when the classification changed or the alert flag flipped.
    pub fn is_transition(&self) -> bool {
        self.previous != self.current || self.alert != AlertChange::Unchanged
    }
}

impl TargetState {
    pub fn tracker(&self) -> HysteresisTracker {
        HysteresisTracker::new(self.stable_streak, self.degraded_streak, self.alert_active)
    }

    pub fn window(&self, capacity: usize) -> LatencyWindow {
        LatencyWindow::from_samples(self.recent_latencies.iter().copied(), capacity)
    }

    pub fn ledger(&self, capacity: usize) -> HistoryLedger {
        HistoryLedger::from_records(self.history.iter().cloned(), capacity)
    }

    /// Apply one probe result.
    pub fn apply(&mut self, record: CheckRecord, policy: &StatePolicy) -> StateChange {
        let previous = self.classification;

        let mut tracker = self.tracker();
        let alert = tracker.observe(record.classification, &policy.alert);

        let mut window = self.window(policy.window_size);
        window.push(record.latency(), record.classification);
        let (average, valid) = window.average(policy.timeout);

        let mut ledger = self.ledger(policy.history_size);
        ledger.append(record.clone());

        self.classification = record.classification;
        self.stable_streak = tracker.stable_streak;
        self.degraded_streak = tracker.degraded_streak;
        self.alert_active = tracker.alert_active;
        self.last_check = Some(record.timestamp);
        self.last_latency_secs = record.latency_secs;
        self.last_detail = record.detail;
        self.recent_latencies = window.to_vec();
        self.average_latency_secs = average;
        self.valid_samples = valid;
        self.history = ledger.into_vec();

        StateChange {
            previous,
            current: self.classification,
            alert,
        }
    }

    /// Clamp the window and history to the given policy without recording a check.
    pub fn enforce_bounds(&mut self, policy: &StatePolicy) {
        let window = self.window(policy.window_size);
        let (average, valid) = window.average(policy.timeout);
        self.recent_latencies = window.to_vec();
        self.average_latency_secs = average;
        self.valid_samples = valid;
        self.history = self.ledger(policy.history_size).into_vec();
    }
}
