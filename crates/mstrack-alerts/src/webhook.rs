use std::time::Duration;

use tracing::info;

use crate::AlertSink;
use crate::error::AlertError;
use crate::payload::CriticalAlert;

/// Alerts must not hold up the visit workflow for long.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// POSTs each alert as JSON to a webhook URL.
pub struct WebhookAlertSink {
    url: String,
    agent: ureq::Agent,
}

impl WebhookAlertSink {
    pub fn new(url: impl Into<String>) -> Self {
        Self::with_timeout(url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> Self {
        let agent: ureq::Agent = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build()
            .into();
        Self {
            url: url.into(),
            agent,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl AlertSink for WebhookAlertSink {
    fn send(&self, alert: &CriticalAlert) -> Result<(), AlertError> {
        let response = self.agent.post(self.url.as_str()).send_json(alert)?;
        info!(
            url = %self.url,
            status = response.status().as_u16(),
            kind = %alert.indicator.code,
            visit_number = alert.visit.visit_number,
            "critical alert delivered"
        );
        Ok(())
    }
}
