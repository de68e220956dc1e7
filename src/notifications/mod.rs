//! Transition notifications.
//!
//! # Data Flow
//! ```text
//! Monitor pass:
//!     StateChange (classification changed or alert flipped)
//!     → TransitionEvent
//!     → NotifierSet::dispatch
//!     → every Notifier that wants the event (log.rs, webhook.rs)
//! ```
//!
//! # Design Decisions
//! - Events are emitted only on change, never on every pass
//! - Each notifier fails alone: errors are logged and counted, never returned to the pass
//! - Notifiers of one event are delivered concurrently

pub mod log;
pub mod webhook;

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures_util::future::join_all;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::config::NotificationConfig;
use crate::health::classification::{CheckRecord, Classification};
use crate::health::state::StateChange;
use crate::observability::metrics;

pub use self::log::LogNotifier;
pub use self::webhook::WebhookNotifier;

/// A change in a target's classification or alert flag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionEvent {
    pub id: Uuid,
    /// Target URL.
    pub target: String,
    pub previous: Classification,
    pub current: Classification,
    pub latency_secs: f64,
    pub detail: Option<String>,
    /// `Some(true)` when the alert turned on, `Some(false)` when it cleared.
    pub alert_flipped: Option<bool>,
    /// Alert flag after this check.
    pub alert_active: bool,
    pub timestamp: DateTime<Utc>,
}

impl TransitionEvent {
    /// Build an event if `change` is a transition.
    pub fn from_change(
        target: &str,
        change: &StateChange,
        record: &CheckRecord,
        alert_active: bool,
    ) -> Option<Self> {
        if !change.is_transition() {
            return None;
        }
        Some(Self {
            id: Uuid::new_v4(),
            target: target.to_string(),
            previous: change.previous,
            current: change.current,
            latency_secs: record.latency_secs,
            detail: record.detail.clone(),
            alert_flipped: change.alert.flipped_to(),
            alert_active,
            timestamp: record.timestamp,
        })
    }

    pub fn is_alert_flip(&self) -> bool {
        self.alert_flipped.is_some()
    }

    /// One-line human readable summary.
    pub fn summary(&self) -> String {
        let mut line = format!("{} {} -> {}", self.target, self.previous, self.current);
        match self.alert_flipped {
            Some(true) => line.push_str(" [alert on]"),
            Some(false) => line.push_str(" [alert cleared]"),
            None => {}
        }
        if let Some(detail) = &self.detail {
            line.push_str(&format!(" ({detail})"));
        }
        line
    }
}

/// Errors a notifier can report for a single delivery.
#[derive(Debug, Error)]
pub enum NotifierError {
    #[error("delivery failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("receiver rejected event with status {0}")]
    Rejected(u16),
}

/// A destination for transition events.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Name used in logs and metrics.
    fn name(&self) -> &str;

    /// Whether this notifier should receive `event`.
    fn wants(&self, _event: &TransitionEvent) -> bool {
        true
    }

    async fn notify(&self, event: &TransitionEvent) -> Result<(), NotifierError>;
}

/// The configured notifiers.
#[derive(Clone, Default)]
pub struct NotifierSet {
    notifiers: Vec<Arc<dyn Notifier>>,
}

impl NotifierSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the notifiers described by the configuration.
    pub fn from_config(config: &NotificationConfig) -> Result<Self, NotifierError> {
        let mut set = Self::new();
        if config.log {
            set.push(Arc::new(LogNotifier));
        }
        for hook in &config.webhooks {
            set.push(Arc::new(WebhookNotifier::new(hook)?));
        }
        Ok(set)
    }

    pub fn push(&mut self, notifier: Arc<dyn Notifier>) {
        self.notifiers.push(notifier);
    }

    pub fn len(&self) -> usize {
        self.notifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notifiers.is_empty()
    }

    /// Deliver every event to every interested notifier. Returns the number of failed deliveries.
    pub async fn dispatch(&self, events: &[TransitionEvent]) -> usize {
        let mut failures = 0;
        for event in events {
            let deliveries = self
                .notifiers
                .iter()
                .filter(|n| n.wants(event))
                .map(|n| async move { (n.name(), n.notify(event).await) });

            for (name, result) in join_all(deliveries).await {
                if let Err(e) = result {
                    failures += 1;
                    metrics::record_notification_failure(name);
                    tracing::warn!(notifier = %name, target_url = %event.target, error = %e, "Notification delivery failed");
                }
            }
        }
        failures
    }
}
