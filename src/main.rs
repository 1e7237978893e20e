use anyhow::{Context, Result};
use chrono::Utc;
use tracing::{error, info};

use price_watch::monitoring::init_logging;
use price_watch::{CheckOutcome, Config, PriceWatcher};

// Always exits 0: a missing price or a dead webhook is not a failed run
// as far as the scheduler is concerned.
#[tokio::main(flavor = "current_thread")]
async fn main() {
    dotenv::dotenv().ok();

    // Logging first, so warnings about bad config values are not lost.
    let (log_level, log_format) = Config::logging_from_env();
    if let Err(e) = init_logging(&log_level, log_format) {
        eprintln!("{}", e);
    }

    let config = Config::from_env();

    if let Err(e) = run(config).await {
        error!("❌ Price check aborted: {:#}", e);
    }
}

async fn run(config: Config) -> Result<()> {
    config.validate().context("invalid configuration")?;

    info!(
        "🚀 {} price watch started ({} fetch, threshold ${:.2})",
        config.item_name,
        config.fetch_strategy.as_str(),
        config.threshold
    );

    let watcher = PriceWatcher::from_config(&config).context("failed to set up price watcher")?;

    match watcher.check(Utc::now()).await {
        CheckOutcome::NoPrice => info!("🏁 Done: no price this run"),
        CheckOutcome::AboveThreshold { price } => info!("🏁 Done: ${:.2} is above threshold", price),
        CheckOutcome::CooldownActive { last_alert, .. } => {
            info!("🏁 Done: cooldown active since {}", last_alert)
        }
        CheckOutcome::NotDelivered { price } => info!("🏁 Done: alert for ${:.2} not delivered", price),
        CheckOutcome::Notified { price, state_recorded } => info!(
            "🏁 Done: alert for ${:.2} sent{}",
            price,
            if state_recorded { "" } else { " (state not recorded)" }
        ),
    }

    Ok(())
}
