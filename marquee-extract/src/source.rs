use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;

/// One listing on the page, queryable by CSS selector relative to itself.
#[async_trait]
pub trait RowHandle: Send + Sync {
    /// Text of the first descendant matching `selector`; `None` if absent.
    async fn text_of(&self, selector: &str) -> Result<Option<String>>;

    /// The row's full visible text.
    async fn visible_text(&self) -> Result<String>;
}

/// Something that can produce rows and the markup they came from.
#[async_trait]
pub trait RowSource: Send + Sync {
    /// Wait up to `timeout` for rows matching `selector`. An expired wait is
    /// an empty vector, not an error.
    async fn wait_for_rows(
        &self,
        selector: &str,
        timeout: Duration,
    ) -> Result<Vec<Box<dyn RowHandle>>>;

    /// Full page markup, used for diagnostic snapshots.
    async fn markup(&self) -> Result<String>;
}
