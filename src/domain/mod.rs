//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the cleaned tables (`RateTable`, `InflationTable`) and the `Dataset` handle
//! - the Selection Snapshot (`Selection`) and its raw input (`SelectionQuery`)
//! - option lists derived from the data (`DashboardOptions`)

pub mod types;

pub use types::*;
