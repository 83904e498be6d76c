//! HTTP webhook alert sink

use super::AlertSink;
use crate::config::schema::AlertConfig;
use crate::domain::{Result, XmlSyncError};
use async_trait::async_trait;
use chrono::Utc;
use reqwest::{Client, ClientBuilder};
use secrecy::ExposeSecret;
use serde::Serialize;
use std::time::Duration;

/// JSON body posted to the webhook
#[derive(Debug, Serialize)]
struct AlertPayload<'a> {
    subject: &'a str,
    body: &'a str,
    sent_at: String,
}

/// Posts alerts as JSON to an HTTP endpoint
pub struct WebhookAlertSink {
    url: String,
    client: Client,
}

impl WebhookAlertSink {
    /// Create a webhook sink
    ///
    /// # Arguments
    ///
    /// * `url` - Endpoint receiving `POST` requests
    /// * `timeout` - Per-request timeout
    ///
    /// # Errors
    ///
    /// Returns `XmlSyncError::Alert` if the HTTP client cannot be built.
    pub fn new(url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = ClientBuilder::new()
            .timeout(timeout)
            .connect_timeout(timeout)
            .build()
            .map_err(|e| XmlSyncError::Alert(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            url: url.into(),
            client,
        })
    }

    /// Create a webhook sink from the `[alert]` section
    ///
    /// # Errors
    ///
    /// Returns `XmlSyncError::Configuration` if no URL is configured.
    pub fn from_config(config: &AlertConfig) -> Result<Self> {
        let url = config.webhook_url.as_ref().ok_or_else(|| {
            XmlSyncError::Configuration("alert.webhook_url is not configured".to_string())
        })?;
        Self::new(
            url.expose_secret().to_string(),
            Duration::from_secs(config.timeout_seconds),
        )
    }
}

#[async_trait]
impl AlertSink for WebhookAlertSink {
    async fn send_alert(&self, subject: &str, body: &str) -> Result<()> {
        let payload = AlertPayload {
            subject,
            body,
            sent_at: Utc::now().to_rfc3339(),
        };

        let resp = self
            .client
            .post(&self.url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| XmlSyncError::Alert(format!("Webhook request failed: {e}")))?;

        if !resp.status().is_success() {
            let status = resp.status();
            let text = resp.text().await.unwrap_or_default();
            return Err(XmlSyncError::Alert(format!(
                "Webhook responded with status {status}: {text}"
            )));
        }

        tracing::info!(subject = %subject, "Alert delivered to webhook");
        Ok(())
    }
}
