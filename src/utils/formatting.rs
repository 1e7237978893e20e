/// Utility functions for formatting values in alert messages
use chrono::{DateTime, Utc};

/// Format a price as dollars with two decimals
pub fn format_usd(amount: f64) -> String {
    format!("${:.2}", amount)
}

/// Format a check time the way alert messages show it
pub fn format_alert_time(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M UTC").to_string()
}

/// Format an optional price for log lines
pub fn format_price_opt(price: Option<f64>) -> String {
    match price {
        Some(p) => format_usd(p),
        None => "n/a".to_string(),
    }
}

/// Format a chrono duration as a compact "3h 05m" string
pub fn format_duration(duration: chrono::Duration) -> String {
    let total_minutes = duration.num_minutes().max(0);
    let hours = total_minutes / 60;
    let minutes = total_minutes % 60;

    if hours > 0 {
        format!("{}h {:02}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}
