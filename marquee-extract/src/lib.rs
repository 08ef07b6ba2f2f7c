//! Chart extraction: page-provider traits, layout strategies and output.
//!
//! - Page providers (`source`): [`source::RowSource`] / [`source::RowHandle`],
//!   implemented for the live browser (`browser`) and for saved markup
//!   (`document`)
//! - Layout strategies (`layout`): one selector scheme per known chart markup
//! - [`extractor::Extractor`]: row discovery cascade and per-field fallbacks
//! - Output (`export`): CSV table and diagnostic page snapshots

pub mod browser;
pub mod document;
pub mod export;
pub mod extractor;
pub mod field;
pub mod layout;
pub mod record;
pub mod source;

pub use extractor::Extractor;
pub use field::Field;
pub use record::MovieRecord;
pub use source::{RowHandle, RowSource};
