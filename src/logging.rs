//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::SubscriberBuilder;

use crate::error::AppError;

/// Install the global subscriber. `filter` uses `RUST_LOG` syntax.
pub fn init_logger(filter: &str) -> Result<(), AppError> {
    let subscriber = SubscriberBuilder::default()
        .with_env_filter(EnvFilter::new(filter))
        .with_file(true)
        .with_line_number(true)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| AppError::runtime(format!("Setting default subscriber failed: {e}")))
}
