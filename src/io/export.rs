//! Export an evaluated dashboard to JSON.
//!
//! The file holds every chart specification and text block for one Selection
//! Snapshot, ready for snapshot comparisons or an offline renderer.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::app::pipeline::DashboardView;
use crate::error::AppError;

/// Write the dashboard view as pretty-printed JSON.
pub fn write_dashboard_json(path: &Path, view: &DashboardView) -> Result<(), AppError> {
    let json = serde_json::to_string_pretty(view)
        .map_err(|e| AppError::runtime(format!("Failed to serialize dashboard: {e}")))?;

    let mut file = File::create(path)
        .map_err(|e| AppError::runtime(format!("Failed to create export file '{}': {e}", path.display())))?;
    file.write_all(json.as_bytes())
        .map_err(|e| AppError::runtime(format!("Failed to write export file '{}': {e}", path.display())))?;
    writeln!(file).map_err(|e| AppError::runtime(format!("Failed to write export file: {e}")))?;

    Ok(())
}
