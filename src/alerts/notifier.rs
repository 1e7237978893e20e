use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;
use tracing::{debug, info};

use crate::constants::ALERT_EMOJI;
use crate::errors::{Result, WatchError};
use crate::utils::{format_alert_time, format_usd};

/// A price that crossed the threshold, ready to be announced.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceAlert {
    pub item_name: String,
    pub price: f64,
    pub threshold: f64,
    pub checked_at: DateTime<Utc>,
}

impl PriceAlert {
    pub fn new(item_name: &str, price: f64, threshold: f64, checked_at: DateTime<Utc>) -> Self {
        Self {
            item_name: item_name.to_string(),
            price,
            threshold,
            checked_at,
        }
    }

    pub fn message(&self) -> String {
        format!(
            "{} {} Price Alert!\nPrice: {}\nThreshold: {}\nTime: {}",
            ALERT_EMOJI,
            self.item_name,
            format_usd(self.price),
            format_usd(self.threshold),
            format_alert_time(self.checked_at)
        )
    }
}

/// Delivery channel for price alerts.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// `Ok` only when the endpoint confirmed receipt.
    async fn notify(&self, alert: &PriceAlert) -> Result<()>;
}

#[derive(Debug, Serialize)]
struct WebhookPayload<'a> {
    content: &'a str,
}

/// Posts alerts to a Discord-style webhook as `{"content": "..."}`.
#[derive(Clone)]
pub struct DiscordWebhookNotifier {
    client: Client,
    webhook_url: Option<String>,
}

impl DiscordWebhookNotifier {
    pub fn new(webhook_url: Option<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| WatchError::Config(format!("failed to build webhook client: {}", e)))?;

        Ok(Self {
            client,
            webhook_url: webhook_url.filter(|url| !url.trim().is_empty()),
        })
    }

    pub fn is_configured(&self) -> bool {
        self.webhook_url.is_some()
    }
}

#[async_trait]
impl Notifier for DiscordWebhookNotifier {
    async fn notify(&self, alert: &PriceAlert) -> Result<()> {
        let url = self
            .webhook_url
            .as_deref()
            .ok_or(WatchError::WebhookNotConfigured)?;

        let message = alert.message();
        let payload = WebhookPayload { content: &message };
        debug!("📨 Posting alert to webhook: {:?}", payload);

        let response = self
            .client
            .post(url)
            .json(&payload)
            .send()
            .await
            .map_err(|e| WatchError::WebhookDelivery(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(WatchError::WebhookStatus {
                status: status.as_u16(),
                body,
            });
        }

        info!("📨 Alert delivered ({})", status);
        Ok(())
    }
}
