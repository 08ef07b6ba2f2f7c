//! Offline page provider over saved markup.
//!
//! Used to replay diagnostic snapshots and to exercise the extractor against
//! fixtures. Each row keeps its own outer HTML and is re-parsed on query, so
//! rows stay `Send + Sync` even though `scraper::Html` is not.
use crate::source::{RowHandle, RowSource};
use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use scraper::{ElementRef, Html, Selector};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct StaticDocument {
    markup: String,
}

impl StaticDocument {
    pub fn new(markup: impl Into<String>) -> Self {
        Self {
            markup: markup.into(),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let markup = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read snapshot {}", path.display()))?;
        Ok(Self::new(markup))
    }

    /// Every element matching `selector`, in document order.
    pub fn select_rows(&self, selector: &str) -> Result<Vec<StaticRow>> {
        let selector = parse_selector(selector)?;
        let doc = Html::parse_document(&self.markup);
        Ok(doc.select(&selector).map(StaticRow::from_element).collect())
    }
}

#[async_trait]
impl RowSource for StaticDocument {
    async fn wait_for_rows(
        &self,
        selector: &str,
        _timeout: Duration,
    ) -> Result<Vec<Box<dyn RowHandle>>> {
        let rows = self.select_rows(selector)?;
        Ok(rows
            .into_iter()
            .map(|row| Box::new(row) as Box<dyn RowHandle>)
            .collect())
    }

    async fn markup(&self) -> Result<String> {
        Ok(self.markup.clone())
    }
}

#[derive(Debug, Clone)]
pub struct StaticRow {
    fragment: String,
    text: String,
}

impl StaticRow {
    fn from_element(el: ElementRef<'_>) -> Self {
        // Table parts are dropped by the parser unless they sit inside a table.
        let outer = el.html();
        let fragment = match el.value().name() {
            "tr" => format!("<table><tbody>{outer}</tbody></table>"),
            "td" | "th" => format!("<table><tbody><tr>{outer}</tr></tbody></table>"),
            _ => outer,
        };
        // Text nodes are joined with a space to approximate rendered text.
        let text = collapse_whitespace(&el.text().collect::<Vec<_>>().join(" "));
        Self { fragment, text }
    }

    fn query(&self, selector: &str) -> Result<Option<String>> {
        let selector = parse_selector(selector)?;
        let doc = Html::parse_document(&self.fragment);
        Ok(doc
            .select(&selector)
            .next()
            .map(|child| collapse_whitespace(&child.text().collect::<String>())))
    }
}

#[async_trait]
impl RowHandle for StaticRow {
    async fn text_of(&self, selector: &str) -> Result<Option<String>> {
        self.query(selector)
    }

    async fn visible_text(&self) -> Result<String> {
        Ok(self.text.clone())
    }
}

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| anyhow!("invalid selector {selector:?}: {e:?}"))
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn table_rows_keep_their_cells() {
        let doc = StaticDocument::new(
            r#"<table><tbody class="rows">
                <tr><td class="name"><a>Heat</a></td><td>8.3</td></tr>
                <tr><td class="name"><a>Ran</a></td><td>8.2</td></tr>
            </tbody></table>"#,
        );
        let rows = doc.select_rows("tbody.rows tr").unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(
            rows[1].text_of("td.name a").await.unwrap().as_deref(),
            Some("Ran")
        );
        assert_eq!(rows[0].visible_text().await.unwrap(), "Heat 8.3");
    }

    #[tokio::test]
    async fn missing_descendant_is_none() {
        let doc = StaticDocument::new("<ul><li class='item'><h3>Alien</h3></li></ul>");
        let rows = doc.select_rows("li.item").unwrap();
        assert_eq!(rows[0].text_of("span.rating").await.unwrap(), None);
    }

    #[test]
    fn invalid_selector_is_an_error() {
        let doc = StaticDocument::new("<p>hi</p>");
        assert!(doc.select_rows("li[").is_err());
    }

    #[test]
    fn whitespace_is_collapsed() {
        assert_eq!(collapse_whitespace("  1.\n   Heat \t"), "1. Heat");
    }
}
