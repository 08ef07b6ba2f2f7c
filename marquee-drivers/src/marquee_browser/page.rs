use crate::marquee_browser::options::EvasionScripts;
use anyhow::Result;
use fantoccini::{elements::Element, error::CmdError, Client, Locator};
use std::time::Duration;
use tracing::debug;

/// Page wrapper providing navigation, bounded waits and element queries.
#[derive(Clone)]
pub struct MarqueePage {
    pub(crate) client: Client,
}

impl MarqueePage {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Navigate to `url` and hide the automation flag.
    pub async fn goto(&self, url: &str) -> Result<()> {
        self.client.goto(url).await.map_err(anyhow::Error::from)?;
        self.client
            .execute(EvasionScripts::hide_webdriver_flag(), vec![])
            .await?;
        Ok(())
    }

    /// Return the full page HTML source.
    pub async fn get_content(&self) -> Result<String> {
        self.client.source().await.map_err(anyhow::Error::from)
    }

    /// Return the page title.
    pub async fn get_title(&self) -> Result<String> {
        self.client.title().await.map_err(anyhow::Error::from)
    }

    /// Wait up to `timeout` for at least one element matching `selector`,
    /// then return every match. A timeout yields an empty vector.
    pub async fn wait_for_elements(
        &self,
        selector: &str,
        timeout: Duration,
    ) -> Result<Vec<MarqueeElement>> {
        let waited = self
            .client
            .wait()
            .at_most(timeout)
            .for_element(Locator::Css(selector))
            .await;

        match waited {
            Ok(_) => self.find_elements(selector).await,
            Err(CmdError::WaitTimeout) => {
                debug!(
                    target: "browser.selector",
                    %selector,
                    timeout_secs = timeout.as_secs(),
                    "wait for elements timed out"
                );
                Ok(Vec::new())
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Find zero or more elements by CSS selector, without waiting.
    pub async fn find_elements(&self, selector: &str) -> Result<Vec<MarqueeElement>> {
        let elements = self.client.find_all(Locator::Css(selector)).await?;
        Ok(elements.into_iter().map(MarqueeElement::new).collect())
    }
}

#[derive(Clone)]
/// Wrapper for DOM elements consistent with [`MarqueePage`].
pub struct MarqueeElement {
    pub element: Element,
}

impl MarqueeElement {
    pub fn new(element: Element) -> Self {
        Self { element }
    }

    /// Visible text of the first descendant matching `selector`, or `None`
    /// when there is no such descendant.
    pub async fn find_text(&self, selector: &str) -> Result<Option<String>> {
        match self.element.find(Locator::Css(selector)).await {
            Ok(child) => Ok(Some(child.text().await?)),
            Err(e) if is_absent(&e) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Return the element's visible text.
    pub async fn get_inner_text(&self) -> Result<String> {
        self.element.text().await.map_err(anyhow::Error::from)
    }
}

/// Whether a lookup failed only because nothing matched the selector.
fn is_absent(err: &CmdError) -> bool {
    err.is_no_such_element()
}

#[cfg(test)]
mod tests {
    use super::*;
    use fantoccini::error::{ErrorStatus, WebDriver};

    #[test]
    fn missing_element_is_absent() {
        let err = CmdError::Standard(WebDriver::new(
            ErrorStatus::NoSuchElement,
            "no such element: td.titleColumn a",
        ));
        assert!(is_absent(&err));
    }

    #[test]
    fn other_failures_are_not_absent() {
        let stale = CmdError::Standard(WebDriver::new(
            ErrorStatus::StaleElementReference,
            "stale element reference",
        ));
        assert!(!is_absent(&stale));
        assert!(!is_absent(&CmdError::WaitTimeout));
    }
}
