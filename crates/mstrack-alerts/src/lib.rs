//! mstrack-alerts
//!
//! Forwarding of critical indicator results to an external notification
//! channel. Delivery is best effort: callers log failures and move on.

pub mod error;
pub mod payload;
pub mod webhook;

use error::AlertError;
pub use payload::CriticalAlert;
pub use webhook::WebhookAlertSink;

/// Destination for critical-tier alerts.
pub trait AlertSink {
    fn send(&self, alert: &CriticalAlert) -> Result<(), AlertError>;
}

/// Sink used when no notification channel is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopAlertSink;

impl AlertSink for NoopAlertSink {
    fn send(&self, alert: &CriticalAlert) -> Result<(), AlertError> {
        tracing::debug!(
            kind = %alert.indicator.code,
            "no alert channel configured, dropping alert"
        );
        Ok(())
    }
}
