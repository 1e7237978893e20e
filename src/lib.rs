//! Single-item marketplace price watcher.
//!
//! Each invocation fetches one listing page, extracts the price, and posts a
//! webhook alert when the price is at or below the threshold and the alert
//! cooldown has elapsed.

pub mod alerts;
pub mod api;
pub mod constants;
pub mod errors;
pub mod listing;
pub mod monitoring;
pub mod utils;
pub mod watcher;

pub use errors::{Result, WatchError};
pub use utils::Config;
pub use watcher::{CheckOutcome, PriceWatcher};
