//! `fx-dashboard` library crate.
//!
//! The binary (`fxdash`) is a thin wrapper around this library so that:
//!
//! - every builder is testable without spawning processes or a server
//! - the web page, the terminal report and the JSON export share one pipeline
//! - the loaded dataset stays an explicit read-only handle, never a global

pub mod app;
pub mod builders;
pub mod chart;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod io;
pub mod logging;
pub mod math;
pub mod report;
pub mod web;
