use chrono::Duration;
use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use tracing::warn;

use crate::constants::{
    CONTAINER_SELECTOR, DEFAULT_BROWSER_WAIT_SECS, DEFAULT_COOLDOWN_MINUTES,
    DEFAULT_FETCH_TIMEOUT_SECS, DEFAULT_ITEM_NAME, DEFAULT_LOG_LEVEL, DEFAULT_PRICE_THRESHOLD,
    DEFAULT_STATE_FILE, DEFAULT_TARGET_URL, DEFAULT_USER_AGENT, DEFAULT_WEBDRIVER_URL,
    DEFAULT_WEBHOOK_TIMEOUT_SECS, PRICE_ATTRIBUTE, PRICE_SELECTOR,
};
use crate::errors::{Result, WatchError};

#[derive(Debug, Clone)]
pub struct Config {
    // Target listing
    pub target_url: String,
    pub item_name: String,
    pub threshold: f64,
    pub selectors: ListingSelectors,

    // Fetching
    pub fetch_strategy: FetchStrategy,
    pub user_agent: String,
    pub fetch_timeout_secs: u64,
    pub webdriver_url: String,
    pub browser_wait_secs: u64,

    // Alerting
    pub cooldown_minutes: i64,
    pub webhook_url: Option<String>,
    pub webhook_timeout_secs: u64,
    pub state_file: PathBuf,

    // Logging
    pub log_level: String,
    pub log_format: LogFormat,
}

/// Structural path to the listed price on the product page.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingSelectors {
    pub container: String,
    pub price: String,
    pub attribute: String,
}

impl Default for ListingSelectors {
    fn default() -> Self {
        Self {
            container: CONTAINER_SELECTOR.to_string(),
            price: PRICE_SELECTOR.to_string(),
            attribute: PRICE_ATTRIBUTE.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FetchStrategy {
    /// Plain GET, for pages that ship the price in server-rendered markup.
    Http,
    /// Headless browser via WebDriver, for client-side rendered pages.
    Browser,
}

impl FetchStrategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            FetchStrategy::Http => "http",
            FetchStrategy::Browser => "browser",
        }
    }
}

impl FromStr for FetchStrategy {
    type Err = WatchError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "http" | "plain" => Ok(FetchStrategy::Http),
            "browser" | "webdriver" | "headless" => Ok(FetchStrategy::Browser),
            other => Err(WatchError::Config(format!("unknown fetch strategy '{}'", other))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LogFormat {
    Text,
    Json,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            target_url: DEFAULT_TARGET_URL.to_string(),
            item_name: DEFAULT_ITEM_NAME.to_string(),
            threshold: DEFAULT_PRICE_THRESHOLD,
            selectors: ListingSelectors::default(),
            fetch_strategy: FetchStrategy::Http,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            fetch_timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
            webdriver_url: DEFAULT_WEBDRIVER_URL.to_string(),
            browser_wait_secs: DEFAULT_BROWSER_WAIT_SECS,
            cooldown_minutes: DEFAULT_COOLDOWN_MINUTES,
            webhook_url: None,
            webhook_timeout_secs: DEFAULT_WEBHOOK_TIMEOUT_SECS,
            state_file: PathBuf::from(DEFAULT_STATE_FILE),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
            log_format: LogFormat::Text,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup. Unset keys fall back to
    /// defaults; unparsable values fall back too, with a warning.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let (log_level, log_format) = Self::logging_from_lookup(&lookup);
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        Self {
            target_url: get("PRICE_WATCH_URL").unwrap_or(defaults.target_url),
            item_name: get("PRICE_WATCH_ITEM").unwrap_or(defaults.item_name),
            threshold: parse_or("PRICE_THRESHOLD", get("PRICE_THRESHOLD"), defaults.threshold),
            selectors: defaults.selectors,

            fetch_strategy: parse_or(
                "FETCH_STRATEGY",
                get("FETCH_STRATEGY"),
                defaults.fetch_strategy,
            ),
            user_agent: get("PRICE_WATCH_USER_AGENT").unwrap_or(defaults.user_agent),
            fetch_timeout_secs: parse_or(
                "FETCH_TIMEOUT_SECS",
                get("FETCH_TIMEOUT_SECS"),
                defaults.fetch_timeout_secs,
            ),
            webdriver_url: get("WEBDRIVER_URL").unwrap_or(defaults.webdriver_url),
            browser_wait_secs: parse_or(
                "BROWSER_WAIT_SECS",
                get("BROWSER_WAIT_SECS"),
                defaults.browser_wait_secs,
            ),

            cooldown_minutes: parse_or(
                "ALERT_COOLDOWN_MINUTES",
                get("ALERT_COOLDOWN_MINUTES"),
                defaults.cooldown_minutes,
            ),
            webhook_url: get("DISCORD_WEBHOOK_URL").map(|url| url.trim().to_string()),
            webhook_timeout_secs: parse_or(
                "WEBHOOK_TIMEOUT_SECS",
                get("WEBHOOK_TIMEOUT_SECS"),
                defaults.webhook_timeout_secs,
            ),
            state_file: get("ALERT_STATE_FILE")
                .map(PathBuf::from)
                .unwrap_or(defaults.state_file),

            log_level,
            log_format,
        }
    }

    pub fn logging_from_env() -> (String, LogFormat) {
        Self::logging_from_lookup(|key| env::var(key).ok())
    }

    /// Just the log level and format, so logging can start before the rest
    /// of the config is parsed (and its warnings emitted).
    pub fn logging_from_lookup<F>(lookup: F) -> (String, LogFormat)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let level = get("LOG_LEVEL").unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string());
        let format = match get("LOG_FORMAT").as_deref().map(str::to_lowercase).as_deref() {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Text,
        };
        (level, format)
    }

    pub fn validate(&self) -> Result<()> {
        if self.target_url.trim().is_empty() {
            return Err(WatchError::Config("target URL is required".into()));
        }

        if !self.threshold.is_finite() || self.threshold < 0.0 {
            return Err(WatchError::Config(format!(
                "price threshold must be a non-negative number, got {}",
                self.threshold
            )));
        }

        if self.cooldown_minutes <= 0 {
            return Err(WatchError::Config("alert cooldown must be positive".into()));
        }

        if Duration::try_minutes(self.cooldown_minutes).is_none() {
            return Err(WatchError::Config(format!(
                "alert cooldown of {} minutes is out of range",
                self.cooldown_minutes
            )));
        }

        if self.fetch_timeout_secs == 0 || self.webhook_timeout_secs == 0 {
            return Err(WatchError::Config("timeouts must be at least one second".into()));
        }

        if self.fetch_strategy == FetchStrategy::Browser && self.browser_wait_secs == 0 {
            return Err(WatchError::Config("browser wait must be at least one second".into()));
        }

        Ok(())
    }

    /// Falls back to the default window when `cooldown_minutes` is out of
    /// range; `validate` rejects those values first.
    pub fn cooldown(&self) -> Duration {
        Duration::try_minutes(self.cooldown_minutes)
            .unwrap_or_else(|| Duration::minutes(DEFAULT_COOLDOWN_MINUTES))
    }

    pub fn fetch_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn browser_wait(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.browser_wait_secs)
    }

    pub fn webhook_timeout(&self) -> std::time::Duration {
        std::time::Duration::from_secs(self.webhook_timeout_secs)
    }
}

fn parse_or<T: FromStr>(key: &str, raw: Option<String>, default: T) -> T {
    match raw {
        Some(value) => value.trim().parse().unwrap_or_else(|_| {
            warn!("⚠️ Ignoring unparsable {}='{}', using default", key, value);
            default
        }),
        None => default,
    }
}
