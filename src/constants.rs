// Target listing
pub const DEFAULT_TARGET_URL: &str = "https://starpets.gg/adopt-me/shop/pet/hamster/24098";
pub const DEFAULT_ITEM_NAME: &str = "Normal Hamster";
pub const DEFAULT_PRICE_THRESHOLD: f64 = 0.26;

// Page structure
pub const CONTAINER_SELECTOR: &str = "div._content_top_right_2ox1k_243";
pub const PRICE_SELECTOR: &str = r#"span[itemprop="price"]"#;
pub const PRICE_ATTRIBUTE: &str = "content";

// Alerting
pub const DEFAULT_COOLDOWN_MINUTES: i64 = 180;
pub const DEFAULT_STATE_FILE: &str = "last_alert.txt";
pub const ALERT_EMOJI: &str = "🐹";

// Network
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0";
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 20;
pub const DEFAULT_BROWSER_WAIT_SECS: u64 = 15;
pub const DEFAULT_WEBHOOK_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_WEBDRIVER_URL: &str = "http://localhost:4444";

// Logging
pub const DEFAULT_LOG_LEVEL: &str = "info";
