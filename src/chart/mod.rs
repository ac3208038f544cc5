//! Chart specifications and their rendering.

pub mod echarts;
pub mod spec;

pub use echarts::EchartsRenderer;
pub use spec::*;

/// Turns a [`ChartSpec`] into something a front-end can draw.
pub trait ChartRenderer: Send + Sync + 'static {
    fn render(&self, spec: &ChartSpec) -> String;
}
