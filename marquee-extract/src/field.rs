use regex::Regex;
use serde::{Serialize, Serializer};
use std::fmt;
use std::sync::OnceLock;

/// An extracted value, or the fact that no layout yielded one.
///
/// A page that literally shows "N/A" is `Present("N/A")`; only `Missing`
/// renders as the sentinel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    Present(String),
    Missing,
}

impl Field {
    pub const SENTINEL: &'static str = "N/A";

    pub fn as_str(&self) -> &str {
        match self {
            Field::Present(value) => value,
            Field::Missing => Self::SENTINEL,
        }
    }

    pub fn is_present(&self) -> bool {
        matches!(self, Field::Present(_))
    }

    pub fn present(&self) -> Option<&str> {
        match self {
            Field::Present(value) => Some(value),
            Field::Missing => None,
        }
    }
}

impl From<Option<String>> for Field {
    fn from(value: Option<String>) -> Self {
        value.map_or(Field::Missing, Field::Present)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Field {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Drop a leading ordinal such as `"12. "` and trim.
///
/// Only a run of digits before the first period counts as an ordinal, so
/// titles like "Mr. Smith Goes to Washington" survive intact.
pub fn strip_ordinal(raw: &str) -> String {
    let trimmed = raw.trim();
    if let Some((prefix, rest)) = trimmed.split_once('.') {
        if !prefix.is_empty() && prefix.chars().all(|c| c.is_ascii_digit()) {
            return rest.trim().to_string();
        }
    }
    trimmed.to_string()
}

/// `"(1994)"` -> `"1994"`.
pub fn strip_parens(raw: &str) -> String {
    raw.trim()
        .trim_matches(|c| c == '(' || c == ')')
        .trim()
        .to_string()
}

fn year_pattern() -> &'static Regex {
    static YEAR: OnceLock<Regex> = OnceLock::new();
    YEAR.get_or_init(|| Regex::new(r"\b(?:19|20)[0-9]{2}\b").expect("year pattern compiles"))
}

/// First standalone 19xx/20xx token in `text`.
pub fn scan_year(text: &str) -> Option<String> {
    year_pattern().find(text).map(|m| m.as_str().to_string())
}
