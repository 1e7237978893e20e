mod cooldown;
mod notifier;
mod state;

pub use cooldown::AlertGate;
pub use notifier::{DiscordWebhookNotifier, Notifier, PriceAlert};
pub use state::{format_timestamp, parse_timestamp, AlertStateStore, FileAlertStateStore};
