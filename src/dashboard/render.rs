use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::{info, warn};

use crate::dashboard::dashboard_model::DashboardModel;
use crate::dashboard::html::generate_dashboard_html;
use crate::dashboard::results_model::RawResults;
use crate::error::{DashboardError, DashboardResult};
use crate::persist::{ensure_parent_dir, write_atomic};
use crate::summary::summary_model::RunSummary;

// ============================================================================
// Load
// ============================================================================

/// Read a JSON artifact written by another process.
///
/// A missing file is fatal. A file that exists but does not parse is
/// logged and replaced by `T::default()`.
pub fn read_artifact<T>(path: &Path) -> DashboardResult<T>
where
    T: DeserializeOwned + Default,
{
    if !path.exists() {
        return Err(DashboardError::MissingArtifact {
            path: path.to_path_buf(),
        });
    }

    let content = std::fs::read_to_string(path).map_err(|source| DashboardError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    match serde_json::from_str(&content) {
        Ok(value) => Ok(value),
        Err(e) => {
            warn!("{} is malformed ({}); rendering with defaults", path.display(), e);
            Ok(T::default())
        }
    }
}

/// Load `results.json` and `learning-summary.json`, both required.
pub fn load_artifacts(
    results_path: &Path,
    summary_path: &Path,
) -> DashboardResult<(RawResults, RunSummary)> {
    let results = read_artifact(results_path)?;
    let summary = read_artifact(summary_path)?;
    Ok((results, summary))
}

// ============================================================================
// Render
// ============================================================================

/// Build the dashboard page from already-loaded artifacts.
pub fn render_dashboard(summary: &RunSummary, results: &RawResults) -> String {
    let model = DashboardModel::derive(summary, results);
    generate_dashboard_html(&model)
}

/// Load both artifacts and render the dashboard page.
pub fn render(results_path: &Path, summary_path: &Path) -> DashboardResult<String> {
    let (results, summary) = load_artifacts(results_path, summary_path)?;
    Ok(render_dashboard(&summary, &results))
}

// ============================================================================
// Persist
// ============================================================================

/// Write `html` to `output_path`, creating parent directories as needed.
pub fn write_dashboard(output_path: &Path, html: &str) -> DashboardResult<()> {
    ensure_parent_dir(output_path).map_err(|source| DashboardError::CreateDir {
        path: output_path.parent().map(Path::to_path_buf).unwrap_or_default(),
        source,
    })?;

    write_atomic(output_path, html.as_bytes()).map_err(|source| DashboardError::Write {
        path: output_path.to_path_buf(),
        source,
    })
}

/// Full batch step: load, derive, render, write. Nothing is written when
/// either input is missing.
pub fn render_to_file(
    results_path: &Path,
    summary_path: &Path,
    output_path: &Path,
) -> DashboardResult<()> {
    let html = render(results_path, summary_path)?;
    write_dashboard(output_path, &html)?;
    info!("Dashboard written to {}", output_path.display());
    Ok(())
}
