//! Live page provider backed by the fantoccini driver.
use crate::source::{RowHandle, RowSource};
use anyhow::Result;
use async_trait::async_trait;
use marquee_drivers::marquee_browser::page::{MarqueeElement, MarqueePage};
use std::time::Duration;

#[async_trait]
impl RowHandle for MarqueeElement {
    async fn text_of(&self, selector: &str) -> Result<Option<String>> {
        self.find_text(selector).await
    }

    async fn visible_text(&self) -> Result<String> {
        self.get_inner_text().await
    }
}

#[async_trait]
impl RowSource for MarqueePage {
    async fn wait_for_rows(
        &self,
        selector: &str,
        timeout: Duration,
    ) -> Result<Vec<Box<dyn RowHandle>>> {
        let elements = self.wait_for_elements(selector, timeout).await?;
        Ok(elements
            .into_iter()
            .map(|element| Box::new(element) as Box<dyn RowHandle>)
            .collect())
    }

    async fn markup(&self) -> Result<String> {
        self.get_content().await
    }
}
