//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → command-line overrides (main.rs)
//!     → validation.rs (semantic checks)
//!     → MonitorConfig (validated, passed by value into the monitor)
//!
//! In loop mode:
//!     watcher.rs detects a content change
//!     → loader.rs parses the new file
//!     → command-line overrides (main.rs)
//!     → monitor validates and applies it before the next pass
//! ```
//!
//! # Design Decisions
//! - No global configuration; every pass receives its config explicitly
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;
pub mod watcher;

pub use loader::{load_config, read_config, ConfigError};
pub use schema::{
    AlertConfig, MonitorConfig, NotificationConfig, ObservabilityConfig, ProbeConfig,
    RetentionConfig, ScheduleConfig, StoreConfig, TargetConfig, WebhookConfig,
};
pub use validation::{validate_config, ValidationError};
