//! Fixed-interval loop around single passes.

use tokio::sync::{broadcast, mpsc};
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::config::{validate_config, ConfigError, MonitorConfig};
use crate::monitor::pass::Monitor;

impl Monitor {
    /// Run passes every `schedule.interval_secs` until `shutdown` fires.
    ///
    /// Configuration updates are applied between passes. A pass in progress always completes.
    pub async fn run(
        mut self,
        mut shutdown: broadcast::Receiver<()>,
        mut config_updates: Option<mpsc::UnboundedReceiver<MonitorConfig>>,
    ) {
        tracing::info!(
            interval_secs = self.config.schedule.interval_secs,
            targets = self.config.targets.len(),
            "Monitor starting"
        );

        let mut ticker = new_ticker(&self.config, Instant::now());

        loop {
            // Shutdown wins over a tick that fell due during a long pass.
            tokio::select! {
                biased;
                _ = shutdown.recv() => {
                    tracing::info!("Monitor received shutdown signal, exiting loop");
                    break;
                }
                _ = ticker.tick() => {}
            }

            if let Some(updates) = config_updates.as_mut() {
                let mut latest = None;
                while let Ok(config) = updates.try_recv() {
                    latest = Some(config);
                }
                if let Some(config) = latest {
                    let previous_interval = self.config.schedule.interval_secs;
                    self = self.reconfigure(config);
                    if self.config.schedule.interval_secs != previous_interval {
                        ticker = new_ticker(&self.config, Instant::now() + self.config.schedule.interval());
                    }
                }
            }

            let report = self.run_pass().await;
            if !report.persisted {
                tracing::warn!("Pass results were not persisted; the next pass starts from the last saved snapshot");
            }
        }
    }

    /// Switch to a new configuration, keeping the current one if it is invalid.
    ///
    /// Monitors built with `from_config` rebuild their prober, store and notifiers;
    /// caller-supplied components stay in place.
    fn reconfigure(mut self, config: MonitorConfig) -> Self {
        if let Err(errors) = validate_config(&config) {
            tracing::error!(
                error = %ConfigError::Validation(errors),
                "Reloaded configuration invalid; keeping current"
            );
            return self;
        }

        if !self.owns_wiring() {
            self.config = config;
            tracing::info!(targets = self.config.targets.len(), "Configuration reloaded");
            return self;
        }

        match Monitor::from_config(config) {
            Ok(monitor) => {
                tracing::info!(targets = monitor.config.targets.len(), "Configuration reloaded");
                monitor
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to apply reloaded configuration; keeping current");
                self
            }
        }
    }
}

fn new_ticker(config: &MonitorConfig, start: Instant) -> time::Interval {
    let mut ticker = time::interval_at(start, config.schedule.interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker
}
