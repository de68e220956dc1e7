//! Webhook notifier: POSTs each event as JSON.

use std::time::Duration;

use async_trait::async_trait;
use url::Url;

use crate::config::WebhookConfig;
use crate::notifications::{Notifier, NotifierError, TransitionEvent};

#[derive(Debug, Clone)]
pub struct WebhookNotifier {
    /// Host-only label; the full URL often carries a token.
    name: String,
    url: String,
    alerts_only: bool,
    client: reqwest::Client,
}

impl WebhookNotifier {
    pub fn new(config: &WebhookConfig) -> Result<Self, NotifierError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            name: webhook_name(&config.url),
            url: config.url.clone(),
            alerts_only: config.alerts_only,
            client,
        })
    }
}

#[async_trait]
impl Notifier for WebhookNotifier {
    fn name(&self) -> &str {
        &self.name
    }

    fn wants(&self, event: &TransitionEvent) -> bool {
        !self.alerts_only || event.is_alert_flip()
    }

    async fn notify(&self, event: &TransitionEvent) -> Result<(), NotifierError> {
        let response = self
            .client
            .post(&self.url)
            .json(event)
            .send()
            .await
            .map_err(|e| NotifierError::Http(e.without_url()))?;
        let status = response.status();
        if !status.is_success() {
            return Err(NotifierError::Rejected(status.as_u16()));
        }
        tracing::debug!(webhook = %self.name, event_id = %event.id, "Webhook delivered");
        Ok(())
    }
}

fn webhook_name(url: &str) -> String {
    match Url::parse(url).ok().as_ref().and_then(Url::host_str) {
        Some(host) => format!("webhook:{host}"),
        None => "webhook".to_string(),
    }
}
