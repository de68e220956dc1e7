//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events via `tracing`)
//!     → metrics.rs (counters, gauges, histograms via `metrics`)
//!
//! Consumers:
//!     → stdout (human readable or JSON lines)
//!     → Prometheus scrape endpoint (optional)
//! ```
//!
//! # Design Decisions
//! - Structured fields (`target_url`, `classification`) on every check-related event
//! - Metric updates are no-ops until a recorder is installed
//! - The exporter is off by default: one-shot runs exit before any scrape

pub mod logging;
pub mod metrics;
