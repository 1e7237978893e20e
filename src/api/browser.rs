use async_trait::async_trait;
use fantoccini::error::CmdError;
use fantoccini::{Client, ClientBuilder, Locator};
use serde_json::json;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::page_fetcher::PageFetcher;
use crate::errors::{Result, WatchError};
use crate::utils::with_timeout;

/// Renders the listing in a headless browser driven over WebDriver.
///
/// Each `fetch` opens its own session and closes it before returning,
/// whether the load succeeded or not. No session outlives a call.
pub struct BrowserPageFetcher {
    webdriver_url: String,
    user_agent: String,
    ready_selector: String,
    page_timeout: Duration,
    element_wait: Duration,
}

impl BrowserPageFetcher {
    pub fn new(
        webdriver_url: &str,
        user_agent: &str,
        ready_selector: &str,
        page_timeout: Duration,
        element_wait: Duration,
    ) -> Self {
        Self {
            webdriver_url: webdriver_url.to_string(),
            user_agent: user_agent.to_string(),
            ready_selector: ready_selector.to_string(),
            page_timeout,
            element_wait,
        }
    }

    async fn load(&self, client: &Client, url: &str) -> Result<String> {
        with_timeout(
            async { client.goto(url).await.map_err(WatchError::from) },
            self.page_timeout,
            "browser navigation",
        )
        .await?;

        debug!("🧭 Waiting up to {:?} for '{}'", self.element_wait, self.ready_selector);
        client
            .wait()
            .at_most(self.element_wait)
            .for_element(Locator::Css(self.ready_selector.as_str()))
            .await
            .map_err(|e| match e {
                CmdError::WaitTimeout => WatchError::Timeout {
                    operation: format!("waiting for '{}'", self.ready_selector),
                    seconds: self.element_wait.as_secs(),
                },
                other => other.into(),
            })?;

        Ok(client.source().await?)
    }
}

#[async_trait]
impl PageFetcher for BrowserPageFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        let session = with_timeout(
            BrowserSession::open(&self.webdriver_url, &self.user_agent),
            self.page_timeout,
            "browser session",
        )
        .await?;

        let result = with_timeout(
            self.load(session.client(), url),
            self.page_timeout + self.element_wait,
            "browser page load",
        )
        .await;

        session.close().await;
        result
    }

    fn strategy_name(&self) -> &'static str {
        "browser"
    }
}

/// An open WebDriver session. Must be ended with [`BrowserSession::close`].
struct BrowserSession {
    client: Client,
}

impl BrowserSession {
    async fn open(webdriver_url: &str, user_agent: &str) -> Result<Self> {
        let mut caps = serde_json::map::Map::new();
        caps.insert(
            "goog:chromeOptions".to_string(),
            json!({
                "args": [
                    "--headless=new",
                    "--no-sandbox",
                    "--disable-gpu",
                    "--disable-dev-shm-usage",
                    format!("--user-agent={}", user_agent),
                ]
            }),
        );
        caps.insert(
            "moz:firefoxOptions".to_string(),
            json!({
                "args": ["-headless"],
                "prefs": { "general.useragent.override": user_agent }
            }),
        );

        let mut builder = ClientBuilder::native();
        builder.capabilities(caps);
        let client = builder.connect(webdriver_url).await?;

        info!("🧭 Browser session opened via {}", webdriver_url);
        Ok(Self { client })
    }

    fn client(&self) -> &Client {
        &self.client
    }

    async fn close(self) {
        match self.client.close().await {
            Ok(()) => debug!("🧭 Browser session closed"),
            Err(e) => warn!("⚠️ Failed to close browser session cleanly: {}", e),
        }
    }
}
