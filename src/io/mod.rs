//! Input/output helpers.
//!
//! - CSV ingest + cleaning (`ingest`)
//! - dashboard JSON export (`export`)

pub mod export;
pub mod ingest;

pub use export::*;
pub use ingest::*;
