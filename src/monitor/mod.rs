//! Check orchestration.
//!
//! # Data Flow
//! ```text
//! One pass (pass.rs):
//!     StateStore::load
//!     → probe every target (concurrently by default, joined before any update)
//!     → TargetState::apply per target (hysteresis, window, history)
//!     → TransitionEvent for every change
//!     → StateStore::save (whole snapshot, once)
//!     → NotifierSet::dispatch
//!
//! Loop mode (runner.rs):
//!     interval tick → apply reloaded config → pass
//!     shutdown signal → exit after the current pass
//! ```
//!
//! # Design Decisions
//! - The unit of work is a single pass; spacing is the caller's concern
//! - State is only written after every probe of the pass has finished
//! - Notifications go out after the snapshot is saved

pub mod pass;
pub mod runner;

use thiserror::Error;

use crate::notifications::NotifierError;

pub use pass::{Monitor, PassReport};

/// Errors building a monitor from configuration.
#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("failed to build notifiers: {0}")]
    Notifier(#[from] NotifierError),
}
