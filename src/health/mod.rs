//! Health determination subsystem.
//!
//! # Data Flow
//! ```text
//! Probe (probe.rs):
//!     One timed GET per target
//!     → CheckRecord { classification, latency, detail }
//!
//! Per-target state (state.rs):
//!     CheckRecord
//!     → hysteresis.rs (stable/degraded streaks, alert latch)
//!     → window.rs (rolling latency average)
//!     → history.rs (bounded check log)
//! ```
//!
//! # Design Decisions
//! - Classification is decided from a single probe; smoothing happens only in the alert flag
//! - Alert entry needs fewer consecutive failures than exit needs successes
//! - Health state is per-target; targets never share mutable state

pub mod classification;
pub mod history;
pub mod hysteresis;
pub mod probe;
pub mod state;
pub mod window;

pub use classification::{CheckRecord, Classification};
pub use history::HistoryLedger;
pub use hysteresis::{AlertChange, HysteresisTracker};
pub use probe::{HttpProber, Prober};
pub use state::{StateChange, StatePolicy, TargetState};
pub use window::LatencyWindow;
