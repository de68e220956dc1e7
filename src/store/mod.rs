//! State persistence subsystem.
//!
//! # Data Flow
//! ```text
//! Pass start:
//!     StateStore::load(targets)
//!     → StoreSnapshot (one TargetState per configured target)
//!
//! Pass end:
//!     StoreSnapshot
//!     → StateStore::save (whole snapshot, atomic replace)
//! ```
//!
//! # Design Decisions
//! - Loading never fails: missing files, corrupt files and malformed entries become defaults
//! - Saving writes a temporary file and renames it over the old one
//! - The snapshot is the entire contract for status pages and read APIs

pub mod json_file;
pub mod memory;
pub mod snapshot;

use thiserror::Error;

pub use json_file::JsonFileStore;
pub use memory::MemoryStore;
pub use snapshot::StoreSnapshot;

/// Errors that can occur while reading or writing the snapshot.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("state store IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("state store serialization error: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Durable home of the per-target state.
pub trait StateStore: Send + Sync {
    /// Load state for `targets`. Anything absent or unreadable defaults.
    fn load(&self, targets: &[String]) -> StoreSnapshot;

    /// Persist the whole snapshot.
    fn save(&self, snapshot: &StoreSnapshot) -> Result<(), StoreError>;

    /// Every stored entry, for read-only consumers.
    fn read_all(&self) -> Result<StoreSnapshot, StoreError>;
}
