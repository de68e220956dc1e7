//! Notifier that writes transition events to the log.

use async_trait::async_trait;

use crate::notifications::{Notifier, NotifierError, TransitionEvent};

#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    fn name(&self) -> &str {
        "log"
    }

    async fn notify(&self, event: &TransitionEvent) -> Result<(), NotifierError> {
        match event.alert_flipped {
            Some(true) => tracing::warn!(
                target_url = %event.target,
                previous = %event.previous,
                current = %event.current,
                detail = ?event.detail,
                "ALERT: target degraded"
            ),
            Some(false) => tracing::info!(
                target_url = %event.target,
                current = %event.current,
                "Alert cleared: target recovered"
            ),
            None => tracing::info!(
                target_url = %event.target,
                previous = %event.previous,
                current = %event.current,
                latency_secs = event.latency_secs,
                detail = ?event.detail,
                "Status changed"
            ),
        }
        Ok(())
    }
}
