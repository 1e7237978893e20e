mod price_watcher;

pub use price_watcher::{CheckOutcome, PriceWatcher};
