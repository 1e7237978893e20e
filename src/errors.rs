use thiserror::Error;

pub type Result<T> = std::result::Result<T, WatchError>;

/// Every recoverable condition a price check can run into.
///
/// Nothing here is fatal to the process: the watcher matches on these,
/// logs them and degrades to "do nothing further this run".
#[derive(Debug, Error)]
pub enum WatchError {
    // Transport
    #[error("network error: {0}")]
    Network(String),

    #[error("HTTP {status} from {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("{operation} timed out after {seconds}s")]
    Timeout { operation: String, seconds: u64 },

    #[error("browser session error: {0}")]
    Browser(String),

    // Page structure
    #[error("container '{selector}' not found")]
    ContainerNotFound { selector: String },

    #[error("price element '{selector}' not found inside container")]
    PriceElementNotFound { selector: String },

    #[error("price attribute '{attribute}' missing or empty")]
    PriceAttributeMissing { attribute: String },

    #[error("price value '{value}' is not a number")]
    PriceUnparsable { value: String },

    #[error("price value {value} is negative or not finite")]
    InvalidPrice { value: f64 },

    #[error("invalid selector '{selector}': {reason}")]
    InvalidSelector { selector: String, reason: String },

    // Configuration
    #[error("configuration error: {0}")]
    Config(String),

    #[error("webhook URL not configured")]
    WebhookNotConfigured,

    // Delivery
    #[error("webhook delivery failed: {0}")]
    WebhookDelivery(String),

    #[error("webhook returned {status}: {body}")]
    WebhookStatus { status: u16, body: String },

    // Persistence
    #[error("state file I/O error: {0}")]
    StateIo(#[from] std::io::Error),

    #[error("state file holds an unreadable timestamp: '{0}'")]
    StateCorrupt(String),
}

impl WatchError {
    /// Failures that happened before any markup was obtained.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            WatchError::Network(_)
                | WatchError::HttpStatus { .. }
                | WatchError::Timeout { .. }
                | WatchError::Browser(_)
        )
    }

    /// Failures caused by the page not having the expected shape.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            WatchError::ContainerNotFound { .. }
                | WatchError::PriceElementNotFound { .. }
                | WatchError::PriceAttributeMissing { .. }
                | WatchError::PriceUnparsable { .. }
                | WatchError::InvalidPrice { .. }
        )
    }
}

impl From<reqwest::Error> for WatchError {
    fn from(err: reqwest::Error) -> Self {
        // Callers that know their timeout map `is_timeout()` to `Timeout` themselves.
        if let Some(status) = err.status() {
            WatchError::HttpStatus {
                url: err.url().map(|u| u.to_string()).unwrap_or_default(),
                status: status.as_u16(),
            }
        } else {
            WatchError::Network(err.to_string())
        }
    }
}

impl From<fantoccini::error::NewSessionError> for WatchError {
    fn from(err: fantoccini::error::NewSessionError) -> Self {
        WatchError::Browser(format!("could not start session: {}", err))
    }
}

impl From<fantoccini::error::CmdError> for WatchError {
    fn from(err: fantoccini::error::CmdError) -> Self {
        WatchError::Browser(err.to_string())
    }
}
