use std::path::Path;

use crate::cli::config::ArtifactPaths;
use crate::dashboard::render::render_to_file;
use crate::error::{DashboardResult, ReporterResult};
use crate::reporter::aggregator::SummaryAggregator;
use crate::reporter::console::format_console_summary;
use crate::reporter::ingest::ingest_event_file;
use crate::reporter::replay::replay_results_file;
use crate::summary::summary_model::RunSummary;

// ============================================================================
// render subcommand
// ============================================================================

/// Render the dashboard from the resolved artifact paths.
pub fn cmd_render(paths: &ArtifactPaths, verbose: u8) -> DashboardResult<()> {
    if verbose > 0 {
        eprintln!(
            "Rendering {} + {} -> {}",
            paths.results.display(),
            paths.summary.display(),
            paths.dashboard.display()
        );
    }

    render_to_file(&paths.results, &paths.summary, &paths.dashboard)?;
    println!("Dashboard written to {}", paths.dashboard.display());
    Ok(())
}

// ============================================================================
// aggregate subcommand
// ============================================================================

/// Where the aggregate subcommand reads lifecycle data from.
#[derive(Debug, Clone, Copy)]
pub enum AggregateSource<'a> {
    Events(&'a Path),
    Results(&'a Path),
}

/// Build and write the learning summary, then print its totals block.
pub fn cmd_aggregate(
    source: AggregateSource<'_>,
    summary_path: &Path,
    verbose: u8,
) -> ReporterResult<RunSummary> {
    let mut aggregator = SummaryAggregator::new(summary_path);

    let summary = match source {
        AggregateSource::Events(path) => {
            let applied = ingest_event_file(path, &mut aggregator)?;
            if verbose > 0 {
                eprintln!("Applied {} events from {}", applied, path.display());
            }
            aggregator.summary().clone()
        }
        AggregateSource::Results(path) => replay_results_file(path, &mut aggregator)?.clone(),
    };

    print!("{}", format_console_summary(&summary));
    println!("Summary written to {}", summary_path.display());
    Ok(summary)
}
