//! Selector schemes for the known chart layouts.
//!
//! Strategies are tried in priority order, both when locating rows and for
//! every individual field, so a row found by one layout can still borrow a
//! field from another.
use crate::field::{strip_ordinal, strip_parens};
use crate::source::{RowHandle, RowSource};
use anyhow::Result;
use async_trait::async_trait;
use std::time::Duration;

#[async_trait]
pub trait LayoutStrategy: Send + Sync {
    /// Short identifier used in logs and errors.
    fn name(&self) -> &'static str;

    fn row_selector(&self) -> &'static str;

    async fn locate_rows(
        &self,
        source: &dyn RowSource,
        timeout: Duration,
    ) -> Result<Vec<Box<dyn RowHandle>>> {
        source.wait_for_rows(self.row_selector(), timeout).await
    }

    async fn extract_title(&self, row: &dyn RowHandle) -> Result<Option<String>>;

    async fn extract_year(&self, row: &dyn RowHandle) -> Result<Option<String>>;

    async fn extract_rating(&self, row: &dyn RowHandle) -> Result<Option<String>>;
}

/// The table-based chart: one `<tr>` per movie.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChartTableLayout;

impl ChartTableLayout {
    pub const ROWS: &'static str = "table.chart.full-width tbody.lister-list tr";
    pub const TITLE: &'static str = "td.titleColumn a";
    pub const YEAR: &'static str = "td.titleColumn span.secondaryInfo";
    pub const RATING: &'static str = "td.imdbRating strong";
}

#[async_trait]
impl LayoutStrategy for ChartTableLayout {
    fn name(&self) -> &'static str {
        "chart-table"
    }

    fn row_selector(&self) -> &'static str {
        Self::ROWS
    }

    async fn extract_title(&self, row: &dyn RowHandle) -> Result<Option<String>> {
        Ok(row.text_of(Self::TITLE).await?.map(|t| t.trim().to_string()))
    }

    async fn extract_year(&self, row: &dyn RowHandle) -> Result<Option<String>> {
        Ok(row.text_of(Self::YEAR).await?.map(|y| strip_parens(&y)))
    }

    async fn extract_rating(&self, row: &dyn RowHandle) -> Result<Option<String>> {
        Ok(row.text_of(Self::RATING).await?.map(|r| r.trim().to_string()))
    }
}

/// The card-based chart: one summary `<li>` per movie, titles carry an ordinal.
#[derive(Debug, Clone, Copy, Default)]
pub struct SummaryListLayout;

impl SummaryListLayout {
    pub const ROWS: &'static str = "li.ipc-metadata-list-summary-item";
    pub const TITLE: &'static str = "h3.ipc-title__text";
    pub const YEAR: &'static str = "span.cli-title-metadata-item:nth-of-type(1)";
    pub const RATING: &'static str = "span.ipc-rating-star--rating";
}

#[async_trait]
impl LayoutStrategy for SummaryListLayout {
    fn name(&self) -> &'static str {
        "summary-list"
    }

    fn row_selector(&self) -> &'static str {
        Self::ROWS
    }

    async fn extract_title(&self, row: &dyn RowHandle) -> Result<Option<String>> {
        Ok(row.text_of(Self::TITLE).await?.map(|t| strip_ordinal(&t)))
    }

    async fn extract_year(&self, row: &dyn RowHandle) -> Result<Option<String>> {
        Ok(row.text_of(Self::YEAR).await?.map(|y| y.trim().to_string()))
    }

    async fn extract_rating(&self, row: &dyn RowHandle) -> Result<Option<String>> {
        Ok(row.text_of(Self::RATING).await?.map(|r| r.trim().to_string()))
    }
}

/// Known layouts, most preferred first.
pub fn default_layouts() -> Vec<Box<dyn LayoutStrategy>> {
    vec![Box::new(ChartTableLayout), Box::new(SummaryListLayout)]
}
