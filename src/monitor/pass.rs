//! A single check pass across all targets.

use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Instant;

use futures_util::future::join_all;
use futures_util::FutureExt;

use crate::config::MonitorConfig;
use crate::health::classification::{CheckRecord, Classification};
use crate::health::probe::{HttpProber, Prober};
use crate::health::state::StatePolicy;
use crate::monitor::MonitorError;
use crate::notifications::{NotifierSet, TransitionEvent};
use crate::observability::metrics;
use crate::store::{JsonFileStore, StateStore};

const PANIC_DETAIL: &str = "unexpected error: probe panicked";

/// Outcome of one pass.
#[derive(Debug, Clone, Default)]
pub struct PassReport {
    /// Targets probed.
    pub checked: usize,
    /// Transition events emitted, in target order.
    pub events: Vec<TransitionEvent>,
    /// Whether the snapshot was written.
    pub persisted: bool,
    /// Notifier deliveries that failed.
    pub notification_failures: usize,
}

/// Drives probes, state updates, persistence and notifications.
pub struct Monitor {
    pub(crate) config: MonitorConfig,
    prober: Arc<dyn Prober>,
    store: Arc<dyn StateStore>,
    notifiers: NotifierSet,
    /// Components were built from `config` and are rebuilt on reload.
    owns_wiring: bool,
}

impl Monitor {
    /// Wire caller-supplied components. They are kept across config reloads.
    pub fn new(
        config: MonitorConfig,
        prober: Arc<dyn Prober>,
        store: Arc<dyn StateStore>,
        notifiers: NotifierSet,
    ) -> Self {
        Self {
            config,
            prober,
            store,
            notifiers,
            owns_wiring: false,
        }
    }

    /// Build the production wiring: HTTP prober, JSON file store, configured notifiers.
    pub fn from_config(config: MonitorConfig) -> Result<Self, MonitorError> {
        let prober = HttpProber::new(&config.probe.user_agent)?;
        let store = JsonFileStore::new(config.store.path.clone());
        let notifiers = NotifierSet::from_config(&config.notifications)?;
        let mut monitor = Self::new(config, Arc::new(prober), Arc::new(store), notifiers);
        monitor.owns_wiring = true;
        Ok(monitor)
    }

    pub(crate) fn owns_wiring(&self) -> bool {
        self.owns_wiring
    }

    pub fn config(&self) -> &MonitorConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<dyn StateStore> {
        &self.store
    }

    /// Run one pass over every configured target.
    pub async fn run_pass(&self) -> PassReport {
        let started = Instant::now();
        let urls: Vec<String> = self.config.targets.iter().map(|t| t.url.clone()).collect();
        let policy = StatePolicy::from_config(&self.config);

        tracing::info!(targets = urls.len(), "Starting check pass");

        let mut snapshot = self.store.load(&urls);
        let records = self.probe_all().await;

        let mut events = Vec::new();
        for (target, record) in self.config.targets.iter().zip(records) {
            metrics::record_check(&target.url, &record);

            let state = snapshot.entry(&target.url);
            let change = state.apply(record.clone(), &policy);
            metrics::record_alert_state(&target.url, state.alert_active);

            tracing::info!(
                target_url = %target.url,
                name = %target.display_name(),
                classification = %record.classification,
                latency_secs = record.latency_secs,
                detail = ?record.detail,
                stable_streak = state.stable_streak,
                degraded_streak = state.degraded_streak,
                alert_active = state.alert_active,
                "Check complete"
            );

            if let Some(event) = TransitionEvent::from_change(&target.url, &change, &record, state.alert_active) {
                events.push(event);
            }
        }

        let persisted = match self.store.save(&snapshot) {
            Ok(()) => true,
            Err(e) => {
                metrics::record_store_save_failure();
                tracing::error!(error = %e, "Failed to save state snapshot; previous snapshot kept");
                false
            }
        };

        let notification_failures = self.notifiers.dispatch(&events).await;

        tracing::info!(
            targets = urls.len(),
            transitions = events.len(),
            persisted,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Check pass finished"
        );

        PassReport {
            checked: urls.len(),
            events,
            persisted,
            notification_failures,
        }
    }

    /// Probe every target, returning one record per target in config order.
    async fn probe_all(&self) -> Vec<CheckRecord> {
        let settings = &self.config.probe;

        if settings.concurrent {
            let handles = self.config.targets.iter().cloned().map(|target| {
                let prober = Arc::clone(&self.prober);
                let settings = settings.clone();
                tokio::spawn(async move { prober.probe(&target, &settings).await })
            });

            join_all(handles)
                .await
                .into_iter()
                .zip(&self.config.targets)
                .map(|(result, target)| match result {
                    Ok(record) => record,
                    Err(e) => {
                        tracing::error!(target_url = %target.url, error = %e, "Probe task failed");
                        CheckRecord::failed(Classification::Error, PANIC_DETAIL)
                    }
                })
                .collect()
        } else {
            let mut records = Vec::with_capacity(self.config.targets.len());
            for target in &self.config.targets {
                let probe = AssertUnwindSafe(self.prober.probe(target, settings)).catch_unwind();
                let record = match probe.await {
                    Ok(record) => record,
                    Err(_) => {
                        tracing::error!(target_url = %target.url, "Probe panicked");
                        CheckRecord::failed(Classification::Error, PANIC_DETAIL)
                    }
                };
                records.push(record);
            }
            records
        }
    }
}
