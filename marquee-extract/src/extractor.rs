use crate::field::scan_year;
use crate::layout::{LayoutStrategy, default_layouts};
use crate::record::MovieRecord;
use crate::source::{RowHandle, RowSource};
use marquee_common::{MarqueeError, Result};
use std::time::Duration;
use tracing::{debug, info, warn};

const PREVIEW_CHARS: usize = 800;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FieldKind {
    Title,
    Year,
    Rating,
}

impl FieldKind {
    fn as_str(self) -> &'static str {
        match self {
            FieldKind::Title => "title",
            FieldKind::Year => "year",
            FieldKind::Rating => "rating",
        }
    }
}

/// Rows found by one layout.
pub struct DiscoveredRows {
    pub layout: &'static str,
    pub rows: Vec<Box<dyn RowHandle>>,
}

/// Turns a page into ranked records using an ordered list of layouts.
pub struct Extractor {
    layouts: Vec<Box<dyn LayoutStrategy>>,
    row_wait: Duration,
}

impl Extractor {
    /// Extractor over the known layouts, waiting up to `row_wait` per layout.
    pub fn new(row_wait: Duration) -> Self {
        Self::with_layouts(default_layouts(), row_wait)
    }

    pub fn with_layouts(layouts: Vec<Box<dyn LayoutStrategy>>, row_wait: Duration) -> Self {
        Self { layouts, row_wait }
    }

    pub fn layout_names(&self) -> Vec<&'static str> {
        self.layouts.iter().map(|l| l.name()).collect()
    }

    /// Try each layout's row selector in turn; the first non-empty match wins.
    pub async fn discover_rows(&self, source: &dyn RowSource) -> Result<DiscoveredRows> {
        for layout in &self.layouts {
            match layout.locate_rows(source, self.row_wait).await {
                Ok(rows) if !rows.is_empty() => {
                    info!(
                        target: "extract.rows",
                        layout = layout.name(),
                        count = rows.len(),
                        "rows located"
                    );
                    return Ok(DiscoveredRows {
                        layout: layout.name(),
                        rows,
                    });
                }
                Ok(_) => {
                    info!(
                        target: "extract.rows",
                        layout = layout.name(),
                        selector = layout.row_selector(),
                        "no rows matched; trying next layout"
                    );
                }
                Err(err) => {
                    warn!(
                        target: "extract.rows",
                        layout = layout.name(),
                        error = %err,
                        "row lookup failed; trying next layout"
                    );
                }
            }
        }

        Err(MarqueeError::NoRowsFound {
            tried: self.layout_names().into_iter().map(String::from).collect(),
        })
    }

    /// Build the record for one row. Never fails: unreadable fields are `Missing`.
    pub async fn extract_row(&self, rank: u32, row: &dyn RowHandle) -> MovieRecord {
        let title = self.cascade(rank, row, FieldKind::Title).await;
        let year = match self.cascade(rank, row, FieldKind::Year).await {
            Some(year) => Some(year),
            None => self.scan_row_for_year(rank, row).await,
        };
        let rating = self.cascade(rank, row, FieldKind::Rating).await;

        MovieRecord {
            rank,
            title: title.into(),
            year: year.into(),
            rating: rating.into(),
        }
    }

    /// Discover rows and extract one record per row, ranked from 1 in page order.
    pub async fn extract(&self, source: &dyn RowSource) -> Result<Vec<MovieRecord>> {
        let found = self.discover_rows(source).await?;

        if let Some(first) = found.rows.first() {
            match first.visible_text().await {
                Ok(text) => info!(
                    target: "extract.rows",
                    preview = %text.chars().take(PREVIEW_CHARS).collect::<String>(),
                    "first row preview"
                ),
                Err(err) => debug!(target: "extract.rows", error = %err, "no preview of first row"),
            }
        }

        let mut records = Vec::with_capacity(found.rows.len());
        for (rank, row) in (1u32..).zip(found.rows.iter()) {
            let record = self.extract_row(rank, row.as_ref()).await;
            let missing = record.missing_fields();
            if !missing.is_empty() {
                debug!(target: "extract.fields", rank, ?missing, "row has missing fields");
            }
            records.push(record);
        }

        let incomplete = records
            .iter()
            .filter(|r| !r.missing_fields().is_empty())
            .count();
        info!(
            target: "extract.rows",
            layout = found.layout,
            records = records.len(),
            incomplete,
            "extraction finished"
        );
        Ok(records)
    }

    async fn cascade(&self, rank: u32, row: &dyn RowHandle, kind: FieldKind) -> Option<String> {
        for layout in &self.layouts {
            let attempt = match kind {
                FieldKind::Title => layout.extract_title(row).await,
                FieldKind::Year => layout.extract_year(row).await,
                FieldKind::Rating => layout.extract_rating(row).await,
            };
            match attempt {
                Ok(Some(value)) => return Some(value),
                Ok(None) => {}
                Err(err) => debug!(
                    target: "extract.fields",
                    rank,
                    field = kind.as_str(),
                    layout = layout.name(),
                    error = %err,
                    "field lookup failed"
                ),
            }
        }
        None
    }

    async fn scan_row_for_year(&self, rank: u32, row: &dyn RowHandle) -> Option<String> {
        match row.visible_text().await {
            Ok(text) => scan_year(&text),
            Err(err) => {
                debug!(target: "extract.fields", rank, error = %err, "row text unavailable");
                None
            }
        }
    }
}
