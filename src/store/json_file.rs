//! JSON file state store.

use std::fs::{self, File};
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};

use serde::Deserialize;
use serde_json::Value;

use crate::health::state::TargetState;
use crate::store::{StateStore, StoreError, StoreSnapshot};

/// Snapshot persisted as a single pretty-printed JSON object.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Sibling path the next snapshot is written to before the rename.
    pub fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| "status.json".into());
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    /// Read the top-level object. `Ok(None)` when the file does not exist.
    fn read_entries(&self) -> Result<Option<serde_json::Map<String, Value>>, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        match serde_json::from_str::<Value>(&raw)? {
            Value::Object(map) => Ok(Some(map)),
            other => Err(StoreError::Io(std::io::Error::new(
                ErrorKind::InvalidData,
                format!("expected a JSON object, found {}", json_kind(&other)),
            ))),
        }
    }

    fn write_atomically(&self, snapshot: &StoreSnapshot) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let tmp = self.temp_path();
        let file = File::create(&tmp)?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, snapshot)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        writer.get_ref().sync_all()?;
        fs::rename(&tmp, &self.path)?;

        // The rename is only durable once the directory entry is flushed.
        if let Err(e) = sync_parent_dir(&self.path) {
            tracing::warn!(path = %self.path.display(), error = %e, "Failed to sync state directory after rename");
        }
        Ok(())
    }
}

#[cfg(unix)]
fn sync_parent_dir(path: &Path) -> std::io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    File::open(dir)?.sync_all()
}

#[cfg(not(unix))]
fn sync_parent_dir(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

fn parse_entry(url: &str, value: &Value) -> Option<TargetState> {
    match TargetState::deserialize(value) {
        Ok(state) => Some(state),
        Err(e) => {
            tracing::warn!(target_url = %url, error = %e, "Malformed state entry, using defaults");
            None
        }
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

impl StateStore for JsonFileStore {
    fn load(&self, targets: &[String]) -> StoreSnapshot {
        let entries = match self.read_entries() {
            Ok(Some(entries)) => entries,
            Ok(None) => {
                tracing::info!(path = %self.path.display(), "No state file yet, starting fresh");
                return StoreSnapshot::with_defaults(targets);
            }
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "State file unreadable, starting fresh");
                return StoreSnapshot::with_defaults(targets);
            }
        };

        let snapshot: StoreSnapshot = targets
            .iter()
            .map(|url| {
                let state = entries
                    .get(url)
                    .and_then(|value| parse_entry(url, value))
                    .unwrap_or_default();
                (url.clone(), state)
            })
            .collect();

        tracing::debug!(path = %self.path.display(), targets = snapshot.len(), "Loaded state snapshot");
        snapshot
    }

    fn save(&self, snapshot: &StoreSnapshot) -> Result<(), StoreError> {
        let result = self.write_atomically(snapshot);
        match &result {
            Ok(()) => {
                tracing::debug!(path = %self.path.display(), targets = snapshot.len(), "Saved state snapshot");
            }
            Err(_) => {
                // The previous snapshot is untouched; only the partial temp file needs to go.
                let _ = fs::remove_file(self.temp_path());
            }
        }
        result
    }

    fn read_all(&self) -> Result<StoreSnapshot, StoreError> {
        let entries = self.read_entries()?.ok_or_else(|| {
            std::io::Error::new(
                ErrorKind::NotFound,
                format!("no state file at {}", self.path.display()),
            )
        })?;
        Ok(entries
            .iter()
            .filter_map(|(url, value)| parse_entry(url, value).map(|state| (url.clone(), state)))
            .collect())
    }
}
