//! Operator alerting
//!
//! The importer raises an alert when an extract file is older than the
//! stale threshold. Delivery goes through [`AlertSink`]: the log sink is the
//! default, the webhook sink is used when `[alert] webhook_enabled = true`.

pub mod webhook;

pub use webhook::WebhookAlertSink;

use crate::config::schema::AlertConfig;
use crate::domain::Result;
use async_trait::async_trait;
use std::sync::Arc;

/// Destination for operator alerts
#[async_trait]
pub trait AlertSink: Send + Sync {
    /// Deliver one alert
    ///
    /// # Errors
    ///
    /// Returns `XmlSyncError::Alert` if delivery fails.
    async fn send_alert(&self, subject: &str, body: &str) -> Result<()>;
}

/// Writes alerts to the log at `WARN` level
#[derive(Debug, Default, Clone, Copy)]
pub struct LogAlertSink;

#[async_trait]
impl AlertSink for LogAlertSink {
    async fn send_alert(&self, subject: &str, body: &str) -> Result<()> {
        tracing::warn!(alert = true, subject = %subject, body = %body, "Alert raised");
        Ok(())
    }
}

/// Create the alert sink selected by configuration
///
/// # Errors
///
/// Returns an error if the webhook is enabled but cannot be set up.
pub fn create_alert_sink(config: &AlertConfig) -> Result<Arc<dyn AlertSink + Send + Sync>> {
    if config.webhook_enabled {
        tracing::debug!("Alerts will be delivered to the configured webhook");
        Ok(Arc::new(WebhookAlertSink::from_config(config)?))
    } else {
        Ok(Arc::new(LogAlertSink))
    }
}
