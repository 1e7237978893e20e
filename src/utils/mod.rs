mod config;
pub mod formatting;
pub mod timeout;

pub use config::{Config, FetchStrategy, ListingSelectors, LogFormat};
pub use formatting::{format_alert_time, format_duration, format_price_opt, format_usd};
pub use timeout::with_timeout;
