mod browser;
mod page_fetcher;

pub use browser::BrowserPageFetcher;
pub use page_fetcher::{HttpPageFetcher, PageFetcher};

use std::sync::Arc;

use crate::errors::Result;
use crate::utils::{Config, FetchStrategy};

/// Build the fetcher selected by `config.fetch_strategy`.
pub fn build_fetcher(config: &Config) -> Result<Arc<dyn PageFetcher>> {
    let fetcher: Arc<dyn PageFetcher> = match config.fetch_strategy {
        FetchStrategy::Http => Arc::new(HttpPageFetcher::new(
            &config.user_agent,
            config.fetch_timeout(),
        )?),
        FetchStrategy::Browser => Arc::new(BrowserPageFetcher::new(
            &config.webdriver_url,
            &config.user_agent,
            &config.selectors.container,
            config.fetch_timeout(),
            config.browser_wait(),
        )),
    };

    Ok(fetcher)
}
