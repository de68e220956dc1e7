//! Lifecycle management for loop mode.
//!
//! # Data Flow
//! ```text
//! Signals (signals.rs):
//!     SIGTERM/SIGINT → Shutdown::trigger
//!
//! Shutdown (shutdown.rs):
//!     trigger → monitor loop finishes its current pass → exit
//! ```
//!
//! # Design Decisions
//! - A pass in progress is never cut short; the snapshot is always saved whole
//! - One-shot mode does not install signal handlers

pub mod shutdown;
pub mod signals;

pub use shutdown::Shutdown;
