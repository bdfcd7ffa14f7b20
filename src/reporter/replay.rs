use std::path::Path;
use std::time::Duration;

use tracing::info;

use crate::dashboard::results_model::{RawResults, SpecEntry, walk_specs};
use crate::error::{DashboardError, ReporterError, ReporterResult};
use crate::reporter::aggregator::SummaryAggregator;
use crate::reporter::events::{TestIdentity, TestResultInfo};
use crate::summary::summary_model::RunSummary;

/// Rebuild a run summary from the engine's `results.json`.
///
/// Every attempt in the results tree becomes one `testComplete` event, in
/// document order. The run duration comes from `stats.duration`.
pub fn replay_results<'a>(
    results: &RawResults,
    aggregator: &'a mut SummaryAggregator,
) -> ReporterResult<&'a RunSummary> {
    let entries = walk_specs(&results.suites);
    let expected: usize = entries.iter().map(|entry| entry.spec.tests.len()).sum();

    aggregator.on_run_start(expected);

    for entry in &entries {
        let identity = identity_for(entry);
        for test in &entry.spec.tests {
            let identity = match test.project_name.as_deref() {
                Some(project) => identity.clone().with_project(project),
                None => identity.clone(),
            };
            for attempt in &test.results {
                let mut result = TestResultInfo::new(attempt.status)
                    .with_duration(attempt.duration)
                    .with_retry(attempt.retry);
                if let Some(message) = attempt.first_error() {
                    result = result.with_error(message);
                }
                aggregator.on_test_complete(&identity, &result);
            }
        }
    }

    let duration_ms = results.stats.as_ref().map(|s| s.duration_ms()).unwrap_or(0);
    aggregator.on_run_end_with_elapsed(Duration::from_millis(duration_ms))
}

/// Load `results_path` and replay it into a summary written to the aggregator's output.
///
/// Unlike the dashboard, the replay produces an artifact, so a results file
/// that is not valid JSON is an error and the existing summary is kept.
pub fn replay_results_file<'a>(
    results_path: &Path,
    aggregator: &'a mut SummaryAggregator,
) -> ReporterResult<&'a RunSummary> {
    let results = load_results_strict(results_path)?;
    info!("replaying {}", results_path.display());
    replay_results(&results, aggregator)
}

fn load_results_strict(path: &Path) -> ReporterResult<RawResults> {
    if !path.exists() {
        return Err(DashboardError::MissingArtifact {
            path: path.to_path_buf(),
        }
        .into());
    }

    let content = std::fs::read_to_string(path).map_err(|source| DashboardError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    serde_json::from_str(&content).map_err(|source| ReporterError::ResultsParse {
        path: path.to_path_buf(),
        source,
    })
}

/// The root suite of each branch is the spec file itself, so it is left
/// out of the describe path.
fn identity_for(entry: &SpecEntry<'_>) -> TestIdentity {
    let mut identity = TestIdentity::new(entry.spec.title.clone())
        .with_path(entry.path.iter().skip(1).copied());
    if let Some(file) = entry.file() {
        identity = identity.with_file(file);
    }
    identity
}
