use chrono::{DateTime, Duration, Utc};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::alerts::{
    AlertGate, AlertStateStore, DiscordWebhookNotifier, FileAlertStateStore, Notifier, PriceAlert,
};
use crate::api::{build_fetcher, PageFetcher};
use crate::errors::{Result, WatchError};
use crate::listing::PriceExtractor;
use crate::utils::{format_alert_time, format_duration, format_price_opt, format_usd, Config};

/// What a single check ended up doing.
#[derive(Debug, Clone, PartialEq)]
pub enum CheckOutcome {
    /// Fetch or extraction failed; nothing else ran.
    NoPrice,
    AboveThreshold { price: f64 },
    CooldownActive { price: f64, last_alert: DateTime<Utc> },
    /// Delivery was attempted but not confirmed; state left untouched.
    NotDelivered { price: f64 },
    Notified { price: f64, state_recorded: bool },
}

impl CheckOutcome {
    pub fn notified(&self) -> bool {
        matches!(self, CheckOutcome::Notified { .. })
    }
}

/// Fetch → extract → gate → notify → record, once per invocation.
pub struct PriceWatcher {
    target_url: String,
    item_name: String,
    threshold: f64,
    fetcher: Arc<dyn PageFetcher>,
    extractor: PriceExtractor,
    gate: AlertGate,
    notifier: Arc<dyn Notifier>,
    store: Arc<dyn AlertStateStore>,
}

impl PriceWatcher {
    pub fn new(
        config: &Config,
        fetcher: Arc<dyn PageFetcher>,
        notifier: Arc<dyn Notifier>,
        store: Arc<dyn AlertStateStore>,
    ) -> Result<Self> {
        Ok(Self {
            target_url: config.target_url.clone(),
            item_name: config.item_name.clone(),
            threshold: config.threshold,
            fetcher,
            extractor: PriceExtractor::new(&config.selectors)?,
            gate: AlertGate::new(config.cooldown()),
            notifier,
            store,
        })
    }

    /// Wire up the production collaborators described by `config`.
    pub fn from_config(config: &Config) -> Result<Self> {
        let fetcher = build_fetcher(config)?;
        let notifier = DiscordWebhookNotifier::new(config.webhook_url.clone(), config.webhook_timeout())?;
        if !notifier.is_configured() {
            warn!("⚠️ DISCORD_WEBHOOK_URL not set; alerts will be skipped");
        }
        let store = FileAlertStateStore::new(config.state_file.clone());

        Self::new(config, fetcher, Arc::new(notifier), Arc::new(store))
    }

    /// Fetch the page and pull the price out of it. Every failure is soft.
    pub async fn current_price(&self) -> Option<f64> {
        let html = match self.fetcher.fetch(&self.target_url).await {
            Ok(html) => html,
            Err(e) if e.is_transport() => {
                warn!("⚠️ Failed to fetch {} ({}): {}", self.target_url, self.fetcher.strategy_name(), e);
                return None;
            }
            Err(e) => {
                warn!("⚠️ Unexpected error fetching {}: {}", self.target_url, e);
                return None;
            }
        };

        match self.extractor.extract(&html) {
            Ok(price) => Some(price),
            Err(e) if e.is_structural() => {
                warn!("⚠️ Page layout did not yield a price: {}", e);
                None
            }
            Err(e) => {
                warn!("⚠️ No price on page: {}", e);
                None
            }
        }
    }

    /// Last recorded alert; unreadable state counts as "never alerted".
    pub async fn last_alert(&self) -> Option<DateTime<Utc>> {
        match self.store.load().await {
            Ok(last) => last,
            Err(WatchError::StateCorrupt(raw)) => {
                warn!("⚠️ Ignoring malformed alert state '{}'", raw);
                None
            }
            Err(e) => {
                warn!("⚠️ Could not read alert state: {}", e);
                None
            }
        }
    }

    pub async fn check(&self, now: DateTime<Utc>) -> CheckOutcome {
        let price = self.current_price().await;
        info!(
            "🔎 Checked at {} | {} price: {}",
            format_alert_time(now),
            self.item_name,
            format_price_opt(price)
        );

        let Some(price) = price else {
            return CheckOutcome::NoPrice;
        };

        if price > self.threshold {
            debug!("{} is above threshold {}", format_usd(price), format_usd(self.threshold));
            return CheckOutcome::AboveThreshold { price };
        }

        let last_alert = self.last_alert().await;
        if let Some(last) = last_alert.filter(|_| !self.gate.permits(last_alert, now)) {
            let remaining = self.gate.remaining(last_alert, now).unwrap_or_else(Duration::zero);
            info!(
                "⏳ Price {} is at or below {} but cooldown is active ({} left)",
                format_usd(price),
                format_usd(self.threshold),
                format_duration(remaining)
            );
            return CheckOutcome::CooldownActive { price, last_alert: last };
        }

        let alert = PriceAlert::new(&self.item_name, price, self.threshold, now);
        match self.notifier.notify(&alert).await {
            Ok(()) => {}
            Err(WatchError::WebhookNotConfigured) => {
                warn!("⚠️ Webhook not configured; alert for {} not sent", format_usd(price));
                return CheckOutcome::NotDelivered { price };
            }
            Err(e) => {
                warn!("⚠️ Alert delivery failed: {}", e);
                return CheckOutcome::NotDelivered { price };
            }
        }

        let state_recorded = match self.store.save(now).await {
            Ok(()) => true,
            Err(e) => {
                warn!("⚠️ Alert sent but could not record it: {}", e);
                false
            }
        };

        CheckOutcome::Notified { price, state_recorded }
    }
}
