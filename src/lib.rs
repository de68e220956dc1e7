//! Endpoint status monitor with debounced alerting and durable state.

pub mod config;
pub mod health;
pub mod lifecycle;
pub mod monitor;
pub mod notifications;
pub mod observability;
pub mod store;

pub use config::MonitorConfig;
pub use health::{CheckRecord, Classification, TargetState};
pub use monitor::{Monitor, PassReport};
pub use store::{JsonFileStore, StateStore, StoreSnapshot};
