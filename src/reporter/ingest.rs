use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::debug;

use crate::error::{ReporterError, ReporterResult};
use crate::reporter::aggregator::SummaryAggregator;
use crate::reporter::events::ReporterEvent;

/// Feed a JSON-lines event stream into `aggregator`.
///
/// Blank lines are skipped. Returns the number of events applied. If the
/// stream ends without a `runEnd`, the aggregator is left unfinalized and
/// the caller decides whether to end the run.
pub fn ingest_events<R: BufRead>(reader: R, aggregator: &mut SummaryAggregator) -> ReporterResult<usize> {
    let mut applied = 0;

    for (index, line) in reader.lines().enumerate() {
        let line_no = index + 1;
        let line = line.map_err(|source| ReporterError::ReadEvents {
            path: "<stream>".into(),
            source,
        })?;
        if line.trim().is_empty() {
            continue;
        }

        let event: ReporterEvent = serde_json::from_str(&line)
            .map_err(|source| ReporterError::EventParse { line: line_no, source })?;
        aggregator.apply(&event)?;
        applied += 1;
    }

    debug!("applied {} reporter events", applied);
    Ok(applied)
}

/// Open `path` and ingest it, ending the run if the stream did not.
pub fn ingest_event_file(path: &Path, aggregator: &mut SummaryAggregator) -> ReporterResult<usize> {
    let file = File::open(path).map_err(|source| ReporterError::ReadEvents {
        path: path.to_path_buf(),
        source,
    })?;

    let applied = ingest_events(BufReader::new(file), aggregator)?;
    if !aggregator.is_finalized() {
        aggregator.on_run_end()?;
    }
    Ok(applied)
}
