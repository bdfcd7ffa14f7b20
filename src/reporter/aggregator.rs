use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use chrono::{SecondsFormat, Utc};
use tracing::{debug, info, warn};

use crate::error::{ReporterError, ReporterResult};
use crate::persist::{ensure_parent_dir, write_atomic};
use crate::reporter::events::{ReporterEvent, TestIdentity, TestResultInfo, to_record};
use crate::summary::summary_model::RunSummary;

// ============================================================================
// Single-owner aggregator
// ============================================================================

/// Builds a `RunSummary` from the engine's lifecycle events and writes it
/// to disk when the run ends.
///
/// One instance per run. The engine is expected to call `on_run_start` once,
/// `on_test_complete` once per attempt and `on_run_end` once. Calling
/// `on_run_start` again only resets the start timestamp. Completions that
/// arrive before `on_run_start` are still counted, and a run that never
/// started reports a duration of zero.
#[derive(Debug)]
pub struct SummaryAggregator {
    output_path: PathBuf,
    started_at: Option<Instant>,
    summary: RunSummary,
    finalized: bool,
}

impl SummaryAggregator {
    pub fn new(output_path: impl Into<PathBuf>) -> Self {
        Self {
            output_path: output_path.into(),
            started_at: None,
            summary: RunSummary::default(),
            finalized: false,
        }
    }

    pub fn output_path(&self) -> &Path {
        &self.output_path
    }

    pub fn summary(&self) -> &RunSummary {
        &self.summary
    }

    pub fn is_finalized(&self) -> bool {
        self.finalized
    }

    pub fn on_run_start(&mut self, expected_tests: usize) {
        self.started_at = Some(Instant::now());
        info!("learning reporter: starting run with {} test(s)", expected_tests);
    }

    pub fn on_test_complete(&mut self, test: &TestIdentity, result: &TestResultInfo) {
        if self.finalized {
            warn!(
                title = %test.title,
                "test completed after the run ended; ignoring"
            );
            return;
        }

        let record = to_record(test, result);
        debug!(
            title = %record.title,
            status = ?record.status,
            duration_ms = record.duration_ms,
            retry = record.retry_index,
            "test complete"
        );
        self.summary.record(record, result.primary_error());
    }

    /// Stamp the summary with the wall-clock time since `on_run_start` and
    /// write it to the output path.
    pub fn on_run_end(&mut self) -> ReporterResult<&RunSummary> {
        let elapsed = self
            .started_at
            .map(|start| start.elapsed())
            .unwrap_or(Duration::ZERO);
        self.on_run_end_with_elapsed(elapsed)
    }

    /// Like `on_run_end`, with the run duration supplied by the caller.
    pub fn on_run_end_with_elapsed(&mut self, elapsed: Duration) -> ReporterResult<&RunSummary> {
        if self.finalized {
            warn!("run already finalized; summary left untouched");
            return Ok(&self.summary);
        }

        self.summary.duration_ms = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
        self.summary.generated_at = Some(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true));
        write_summary(&self.output_path, &self.summary)?;
        self.finalized = true;

        let totals = &self.summary.totals;
        info!(
            total = totals.total,
            passed = totals.passed,
            failed = totals.failed,
            skipped = totals.skipped,
            path = %self.output_path.display(),
            "learning reporter: run complete"
        );
        Ok(&self.summary)
    }

    /// Dispatch one event to the matching handler.
    pub fn apply(&mut self, event: &ReporterEvent) -> ReporterResult<()> {
        match event {
            ReporterEvent::RunStart { test_count } => self.on_run_start(*test_count),
            ReporterEvent::TestComplete { test, result } => self.on_test_complete(test, result),
            ReporterEvent::RunEnd => {
                self.on_run_end()?;
            }
        }
        Ok(())
    }
}

/// Serialize `summary` as pretty JSON and replace the file at `path`.
pub fn write_summary(path: &Path, summary: &RunSummary) -> ReporterResult<()> {
    let json = serde_json::to_string_pretty(summary).map_err(ReporterError::Serialize)?;

    ensure_parent_dir(path).map_err(|source| ReporterError::CreateDir {
        path: path.parent().map(Path::to_path_buf).unwrap_or_default(),
        source,
    })?;

    write_atomic(path, json.as_bytes()).map_err(|source| ReporterError::Write {
        path: path.to_path_buf(),
        source,
    })
}

// ============================================================================
// Shared aggregator for parallel workers
// ============================================================================

/// Cloneable handle that serializes every update through a mutex, for
/// engines that report completions from several workers at once.
#[derive(Debug, Clone)]
pub struct SharedAggregator {
    inner: Arc<Mutex<SummaryAggregator>>,
}

impl SharedAggregator {
    pub fn new(aggregator: SummaryAggregator) -> Self {
        Self {
            inner: Arc::new(Mutex::new(aggregator)),
        }
    }

    pub fn on_run_start(&self, expected_tests: usize) {
        self.lock().on_run_start(expected_tests);
    }

    pub fn on_test_complete(&self, test: &TestIdentity, result: &TestResultInfo) {
        self.lock().on_test_complete(test, result);
    }

    pub fn on_run_end(&self) -> ReporterResult<RunSummary> {
        self.lock().on_run_end().cloned()
    }

    /// Copy of the summary as it stands right now.
    pub fn snapshot(&self) -> RunSummary {
        self.lock().summary().clone()
    }

    // Poisoning is ignored; a worker panic must not lose the run summary.
    fn lock(&self) -> MutexGuard<'_, SummaryAggregator> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
