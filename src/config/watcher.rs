//! Configuration file watcher for hot reload in loop mode.
//!
//! The parent directory is watched rather than the file itself, so editors that
//! save by renaming a new file into place keep triggering reloads.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use notify::{Config, Event, RecommendedWatcher, RecursiveMode, Watcher};
use tokio::sync::mpsc;

use crate::config::loader::read_config;
use crate::config::schema::MonitorConfig;

/// Publishes the parsed configuration whenever the file's content changes.
///
/// Published configs are not validated: the receiver applies its own overrides first.
pub struct ConfigWatcher {
    path: PathBuf,
    update_tx: mpsc::UnboundedSender<MonitorConfig>,
}

impl ConfigWatcher {
    pub fn new(path: &Path) -> (Self, mpsc::UnboundedReceiver<MonitorConfig>) {
        let (update_tx, update_rx) = mpsc::unbounded_channel();
        let watcher = Self {
            path: path.to_path_buf(),
            update_tx,
        };
        (watcher, update_rx)
    }

    /// Start watching. Dropping the returned handle stops the watch.
    pub fn run(self) -> Result<RecommendedWatcher, notify::Error> {
        let Self { path, update_tx } = self;
        let dir = match path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let file_name = path.file_name().map(|n| n.to_os_string());
        let last_seen = Mutex::new(fs::read_to_string(&path).ok());

        let handler_path = path.clone();
        let mut watcher = RecommendedWatcher::new(
            move |res: notify::Result<Event>| {
                let event = match res {
                    Ok(event) => event,
                    Err(e) => {
                        tracing::error!(error = ?e, "Config watch error");
                        return;
                    }
                };
                if !(event.kind.is_modify() || event.kind.is_create()) {
                    return;
                }
                if !event.paths.iter().any(|p| p.file_name() == file_name.as_deref()) {
                    return;
                }

                let Ok(raw) = fs::read_to_string(&handler_path) else {
                    // Mid-rename; the create event for the new file follows.
                    return;
                };
                {
                    let Ok(mut last) = last_seen.lock() else { return };
                    if last.as_deref() == Some(raw.as_str()) {
                        return;
                    }
                    *last = Some(raw);
                }

                match read_config(&handler_path) {
                    Ok(config) => {
                        tracing::info!(path = %handler_path.display(), targets = config.targets.len(), "Config file changed");
                        let _ = update_tx.send(config);
                    }
                    Err(e) => {
                        tracing::error!(path = %handler_path.display(), error = %e, "Changed config unreadable; keeping current configuration");
                    }
                }
            },
            Config::default().with_poll_interval(Duration::from_secs(2)),
        )?;

        watcher.watch(&dir, RecursiveMode::NonRecursive)?;

        tracing::info!(path = %path.display(), "Config watcher started");
        Ok(watcher)
    }
}
