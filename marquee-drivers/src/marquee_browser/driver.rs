use crate::marquee_browser::{
    options::{chrome_capabilities, DriverOptions},
    page::MarqueePage,
};
use anyhow::{Context, Result};
use fantoccini::{Client, ClientBuilder};
use tracing::info;

/// Thin wrapper around a `fantoccini` WebDriver session.
pub struct MarqueeDriver {
    pub client: Client,
}

impl MarqueeDriver {
    /// Open a session on a running WebDriver service (Chromedriver by default).
    pub async fn new(options: DriverOptions) -> Result<Self> {
        let caps = chrome_capabilities(&options);

        let client = ClientBuilder::native()
            .capabilities(caps)
            .connect(&options.webdriver_url)
            .await
            .with_context(|| format!("failed to connect to WebDriver at {}", options.webdriver_url))?;

        info!(
            target: "browser.session",
            endpoint = %options.webdriver_url,
            headless = options.headless,
            "browser session started"
        );

        Ok(Self { client })
    }

    /// A page handle sharing this session.
    pub fn page(&self) -> MarqueePage {
        MarqueePage::new(self.client.clone())
    }

    /// Close the underlying browser session.
    pub async fn close(self) -> Result<()> {
        self.client.close().await?;
        info!(target: "browser.session", "browser session closed");
        Ok(())
    }
}
