use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use crate::errors::{Result, WatchError};

/// Source of listing markup for a URL.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String>;

    fn strategy_name(&self) -> &'static str;
}

/// Single GET per call, no retries.
#[derive(Clone)]
pub struct HttpPageFetcher {
    client: Client,
    timeout: Duration,
}

impl HttpPageFetcher {
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()
            .map_err(|e| WatchError::Config(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self { client, timeout })
    }

    fn map_error(&self, err: reqwest::Error) -> WatchError {
        if err.is_timeout() {
            WatchError::Timeout {
                operation: "page fetch".to_string(),
                seconds: self.timeout.as_secs(),
            }
        } else {
            err.into()
        }
    }
}

#[async_trait]
impl PageFetcher for HttpPageFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        debug!("🌐 GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| self.map_error(e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(WatchError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|e| self.map_error(e))?;
        debug!("🌐 Received {} bytes from {}", body.len(), url);

        Ok(body)
    }

    fn strategy_name(&self) -> &'static str {
        "http"
    }
}
