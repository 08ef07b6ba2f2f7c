//! Common types and utilities shared across Marquee crates.
//!
//! This crate holds the shared error type and the observability setup used by
//! the binary and by integration tests. It stays dependency-light so every
//! other crate in the workspace can depend on it.
//!
//! # Overview
//!
//! - [`observability`]: Centralised tracing/logging initialisation
//! - [`MarqueeError`] and [`Result`]: Shared error handling
//!
//! # Examples
//!
//! ```rust
//! use marquee_common::MarqueeError;
//!
//! let err = MarqueeError::NoRowsFound {
//!     tried: vec!["chart-table".into(), "summary-list".into()],
//! };
//! assert!(err.is_no_rows());
//! assert_eq!(
//!     err.to_string(),
//!     "No rows found on page (tried: chart-table, summary-list)"
//! );
//! ```

pub mod observability;

/// Error types used across the Marquee system.
#[derive(thiserror::Error, Debug)]
pub enum MarqueeError {
    /// None of the known page layouts produced a single row.
    #[error("No rows found on page (tried: {})", .tried.join(", "))]
    NoRowsFound {
        /// Names of the layouts that were attempted, in order.
        tried: Vec<String>,
    },

    /// A driver (browser, page provider, etc.) reported an error.
    #[error("Driver error: {0}")]
    Driver(#[from] anyhow::Error),

    /// Configuration was incomplete or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Writing the table or a snapshot failed.
    #[error("Output error: {0}")]
    Output(String),

    /// The scrape phase panicked; the payload message is preserved.
    #[error("Scrape panicked: {0}")]
    Panicked(String),
}

impl MarqueeError {
    /// True for the "nothing on the page matched" failure.
    pub fn is_no_rows(&self) -> bool {
        matches!(self, MarqueeError::NoRowsFound { .. })
    }
}

/// Convenient alias for results that use [`MarqueeError`].
pub type Result<T> = std::result::Result<T, MarqueeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn driver_errors_wrap_anyhow() {
        let err: MarqueeError = anyhow::anyhow!("session gone").into();
        assert!(!err.is_no_rows());
        assert_eq!(err.to_string(), "Driver error: session gone");
    }

    #[test]
    fn no_rows_lists_every_layout() {
        let err = MarqueeError::NoRowsFound { tried: vec![] };
        assert_eq!(err.to_string(), "No rows found on page (tried: )");
    }
}
