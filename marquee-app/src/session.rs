use anyhow::Result;
use async_trait::async_trait;
use marquee_config::MarqueeConfig;
use marquee_drivers::marquee_browser::{
    driver::MarqueeDriver,
    options::{BrowserProfile, DriverOptions},
    page::MarqueePage,
};
use marquee_extract::RowSource;
use marquee_extract::document::StaticDocument;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::time::sleep;
use tracing::{info, warn};

/// A page source that is opened once and must be closed exactly once.
#[async_trait]
pub trait ScrapeSession: Send + Sized {
    async fn navigate(&mut self, url: &str) -> Result<()>;

    fn page(&self) -> &dyn RowSource;

    async fn close(self) -> Result<()>;
}

/// Live Chrome session over WebDriver.
pub struct BrowserSession {
    driver: MarqueeDriver,
    page: MarqueePage,
    linger: Duration,
}

impl BrowserSession {
    pub async fn open(cfg: &MarqueeConfig) -> Result<Self> {
        let options = DriverOptions {
            webdriver_url: cfg.browser.webdriver_url.clone(),
            headless: cfg.browser.headless,
            profile: BrowserProfile {
                user_agent: cfg.browser.user_agent.clone(),
                viewport: (cfg.browser.window_width, cfg.browser.window_height),
            },
        };
        let driver = MarqueeDriver::new(options).await?;
        let page = driver.page();
        Ok(Self {
            driver,
            page,
            linger: cfg.linger(),
        })
    }
}

#[async_trait]
impl ScrapeSession for BrowserSession {
    async fn navigate(&mut self, url: &str) -> Result<()> {
        self.page.goto(url).await?;
        match self.page.get_title().await {
            Ok(title) => info!(%title, "page loaded"),
            Err(err) => warn!(error = %err, "page loaded but title unavailable"),
        }
        Ok(())
    }

    fn page(&self) -> &dyn RowSource {
        &self.page
    }

    async fn close(self) -> Result<()> {
        if !self.linger.is_zero() {
            info!(linger_ms = self.linger.as_millis() as u64, "keeping browser open briefly");
            sleep(self.linger).await;
        }
        self.driver.close().await
    }
}

/// Saved snapshot standing in for the live page.
pub struct ReplaySession {
    document: StaticDocument,
    path: PathBuf,
}

impl ReplaySession {
    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self {
            document: StaticDocument::from_path(path)?,
            path: path.to_path_buf(),
        })
    }
}

#[async_trait]
impl ScrapeSession for ReplaySession {
    async fn navigate(&mut self, url: &str) -> Result<()> {
        info!(
            snapshot = %self.path.display(),
            %url,
            "replaying saved snapshot instead of loading page"
        );
        Ok(())
    }

    fn page(&self) -> &dyn RowSource {
        &self.document
    }

    async fn close(self) -> Result<()> {
        Ok(())
    }
}
