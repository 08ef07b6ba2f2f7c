use crate::field::Field;
use serde::Serialize;

/// Column names, in output order.
pub const CSV_HEADER: [&str; 4] = ["Rank", "Title", "Year", "Rating"];

/// One ranked movie, as read from a single row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct MovieRecord {
    /// 1-based position on the page.
    pub rank: u32,
    pub title: Field,
    pub year: Field,
    pub rating: Field,
}

impl MovieRecord {
    /// Fields that no layout could fill.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("title", &self.title),
            ("year", &self.year),
            ("rating", &self.rating),
        ]
        .into_iter()
        .filter(|(_, field)| !field.is_present())
        .map(|(name, _)| name)
        .collect()
    }
}
