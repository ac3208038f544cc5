//! Terminal reporting for `fxdash report`.
//!
//! Formatting lives in one place so the builders stay presentation-free and
//! output changes are localized.

pub mod format;

pub use format::*;
