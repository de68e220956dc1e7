//! Classification of a single probe outcome.

use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Health classification of one check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Classification {
    Up,
    Slow,
    Error,
    Down,
    /// Initial value; never produced by a probe.
    #[default]
    Unknown,
}

impl Classification {
    /// True only for `Up`. Every other classification counts as degraded.
    pub fn is_stable(self) -> bool {
        matches!(self, Classification::Up)
    }

    /// True when the probe produced a real latency measurement worth averaging.
    pub fn has_measured_latency(self) -> bool {
        matches!(self, Classification::Up | Classification::Slow)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Classification::Up => "UP",
            Classification::Slow => "SLOW",
            Classification::Error => "ERROR",
            Classification::Down => "DOWN",
            Classification::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one probe. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckRecord {
    /// When the check completed (UTC).
    pub timestamp: DateTime<Utc>,
    pub classification: Classification,
    /// Measured latency in seconds; `0.0` when nothing was measured.
    #[serde(default)]
    pub latency_secs: f64,
    /// HTTP status, failure category or timeout marker.
    #[serde(default)]
    pub detail: Option<String>,
}

impl CheckRecord {
    pub fn new(
        classification: Classification,
        latency: Duration,
        detail: Option<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            classification,
            latency_secs: latency.as_secs_f64(),
            detail,
        }
    }

    /// A failed check with no meaningful latency.
    pub fn failed(classification: Classification, detail: impl Into<String>) -> Self {
        Self::new(classification, Duration::ZERO, Some(detail.into()))
    }

    pub fn latency(&self) -> Duration {
        Duration::try_from_secs_f64(self.latency_secs).unwrap_or_default()
    }

    /// Override the timestamp, used when replaying recorded outcomes.
    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = timestamp;
        self
    }
}
