use tracing::debug;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::errors::{Result, WatchError};
use crate::utils::LogFormat;

/// Install the global tracing subscriber.
///
/// `RUST_LOG` wins over `log_level` when set. Output goes to stderr so the
/// scheduler's captured stdout stays empty.
pub fn init_logging(log_level: &str, format: LogFormat) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    let registry = tracing_subscriber::registry().with(filter);

    let result = match format {
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Text => registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_writer(std::io::stderr),
            )
            .try_init(),
    };

    result.map_err(|e| WatchError::Config(format!("failed to initialise logging: {}", e)))?;

    debug!("Logging initialised at '{}' ({:?})", log_level, format);
    Ok(())
}
