//! HTTP presentation layer.
//!
//! Handlers are thin: parse the query, resolve a [`Selection`], run the
//! pipeline, then serialize or render. Every request reads the same shared
//! [`Dataset`].
//!
//! [`Selection`]: crate::domain::Selection
//! [`Dataset`]: crate::domain::Dataset

pub mod page;
pub mod query;
pub mod server;

pub use server::serve;

pub mod endpoints {
    pub const GET_INDEX: &str = "/";
    pub const GET_OPTIONS: &str = "/api/options";
    pub const GET_DASHBOARD: &str = "/api/dashboard";
    pub const GET_FORECAST_OPTIONS: &str = "/api/forecast-options";
}
