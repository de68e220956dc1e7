//! statuswatch: endpoint status monitor.
//!
//! # Architecture Overview
//!
//! ```text
//!            ┌──────────────────────────────────────────────────────────────┐
//!            │                         STATUSWATCH                          │
//!            │                                                              │
//!  config ───┼─▶┌────────┐   ┌──────────────────────────────────────────┐   │
//!  (TOML)    │  │ config │──▶│                 monitor                  │   │
//!            │  └────────┘   │  load ─▶ probe ─▶ apply ─▶ save ─▶ notify│   │
//!            │               └───┬────────┬────────┬───────┬───────┬────┘   │
//!            │                   │        │        │       │       │        │
//!            │                   ▼        ▼        ▼       ▼       ▼        │
//!            │               ┌──────┐ ┌──────┐ ┌──────┐ ┌─────┐ ┌──────┐    │
//!  targets ◀─┼───────────────│store │ │probe │ │state │ │store│ │notif.│────┼──▶ log / webhooks
//!            │               └──────┘ └──────┘ └──────┘ └─────┘ └──────┘    │
//!            │                   ▲                          │               │
//!            │                   └──── status.json ◀────────┘               │
//!            │                                                              │
//!            │  Cross-cutting: observability (tracing, metrics), lifecycle  │
//!            └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modes
//! - `--once`: one pass, then exit (cron / CI schedulers)
//! - default: a pass every `schedule.interval_secs` until SIGINT/SIGTERM,
//!   reloading the config file when it changes

use std::path::PathBuf;

use clap::Parser;
use tokio::sync::mpsc;

use statuswatch::config::watcher::ConfigWatcher;
use statuswatch::config::{read_config, validate_config, ConfigError, MonitorConfig, TargetConfig};
use statuswatch::lifecycle::{signals, Shutdown};
use statuswatch::observability::{logging, metrics};
use statuswatch::Monitor;

#[derive(Parser, Debug, Clone)]
#[command(name = "statuswatch", version)]
#[command(about = "Probe endpoints and keep debounced, durable status", long_about = None)]
struct Args {
    /// TOML configuration file
    #[arg(short, long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Extra target URL to check (repeatable)
    #[arg(short, long = "target", value_name = "URL")]
    targets: Vec<String>,

    /// Expected text in the response body of targets given with --target
    #[arg(short, long, value_name = "TEXT")]
    keyword: Option<String>,

    /// State file path, overriding the config
    #[arg(long, value_name = "PATH")]
    state: Option<PathBuf>,

    /// Seconds between passes, overriding the config
    #[arg(long, value_name = "SECS")]
    interval_secs: Option<u64>,

    /// Run a single pass and exit
    #[arg(long)]
    once: bool,
}

impl Args {
    /// Apply command-line overrides on top of a parsed config.
    fn apply(&self, config: &mut MonitorConfig) {
        for url in &self.targets {
            if config.targets.iter().any(|t| &t.url == url) {
                continue;
            }
            let mut target = TargetConfig::new(url.clone());
            target.keyword = self.keyword.clone();
            config.targets.push(target);
        }
        if let Some(path) = &self.state {
            config.store.path = path.clone();
        }
        if let Some(secs) = self.interval_secs {
            config.schedule.interval_secs = secs;
        }
    }

    fn resolve_config(&self) -> Result<MonitorConfig, ConfigError> {
        let mut config = match &self.config {
            Some(path) => read_config(path)?,
            None => MonitorConfig::default(),
        };
        self.apply(&mut config);
        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let config = args.resolve_config()?;

    logging::init_logging(&config.observability);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        targets = config.targets.len(),
        state_path = %config.store.path.display(),
        timeout_secs = config.probe.timeout_secs,
        slow_threshold_secs = config.probe.slow_threshold_secs,
        "statuswatch starting"
    );

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => metrics::init_metrics(addr),
            Err(_) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                "Failed to parse metrics address"
            ),
        }
    }

    let monitor = Monitor::from_config(config)?;

    if args.once {
        let report = monitor.run_pass().await;
        tracing::info!(
            checked = report.checked,
            transitions = report.events.len(),
            persisted = report.persisted,
            "Single pass complete"
        );
        return Ok(());
    }

    let shutdown = Shutdown::new();
    let shutdown_rx = shutdown.subscribe();
    signals::spawn_signal_listener(shutdown.clone());

    // Keep the watcher alive for the whole loop.
    let mut _watcher = None;
    let mut updates = None;
    if let Some(path) = &args.config {
        let (watcher, mut raw_updates) = ConfigWatcher::new(path);
        match watcher.run() {
            Ok(w) => {
                _watcher = Some(w);
                let (tx, rx) = mpsc::unbounded_channel();
                let overrides = args.clone();
                tokio::spawn(async move {
                    while let Some(mut config) = raw_updates.recv().await {
                        overrides.apply(&mut config);
                        if tx.send(config).is_err() {
                            break;
                        }
                    }
                });
                updates = Some(rx);
            }
            Err(e) => tracing::warn!(error = %e, "Config hot reload unavailable"),
        }
    }

    monitor.run(shutdown_rx, updates).await;

    tracing::info!("Shutdown complete");
    Ok(())
}
