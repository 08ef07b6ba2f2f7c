//! Driver layer for browser automation.
//!
//! This crate exposes the WebDriver session and the page/element helpers the
//! extractor reads from.
//!
//! - [`marquee_browser::driver::MarqueeDriver`]: WebDriver client wrapper
//! - [`marquee_browser::page::MarqueePage`]: navigation, waits and DOM queries
//! - [`marquee_browser::options`]: Chrome arguments, capabilities and evasions
pub mod marquee_browser;
