use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

use crate::reporter::events::RawStatus;
use crate::summary::lenient::{count, lenient, lenient_map, lenient_vec, non_empty_string};

pub const UNKNOWN_FILE: &str = "unknown-file";
pub const UNKNOWN_PROJECT: &str = "unknown";
pub const UNKNOWN_ERROR: &str = "Unknown error";

// ============================================================================
// Outcome
// ============================================================================

/// Normalized outcome of one test attempt.
///
/// Raw engine statuses collapse onto three buckets: `timedOut` counts as
/// `failed`, and anything that is neither passed nor failed counts as
/// `skipped`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum TestOutcome {
    Passed,
    Failed,
    #[default]
    Skipped,
}

impl From<RawStatus> for TestOutcome {
    fn from(status: RawStatus) -> Self {
        match status {
            RawStatus::Passed => TestOutcome::Passed,
            RawStatus::Failed | RawStatus::TimedOut => TestOutcome::Failed,
            RawStatus::Skipped | RawStatus::Interrupted | RawStatus::Unknown => {
                TestOutcome::Skipped
            }
        }
    }
}

impl From<String> for TestOutcome {
    fn from(raw: String) -> Self {
        RawStatus::from(raw).into()
    }
}

impl TestOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            TestOutcome::Passed => "passed",
            TestOutcome::Failed => "failed",
            TestOutcome::Skipped => "skipped",
        }
    }
}

impl fmt::Display for TestOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Per-attempt records
// ============================================================================

/// One executed test attempt. Retries produce additional records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestRecord {
    #[serde(default, deserialize_with = "lenient")]
    pub title: String,

    /// Describe-block path plus title; equals `title` when no hierarchy was reported
    #[serde(default, deserialize_with = "lenient")]
    pub full_title: String,

    #[serde(default = "unknown_file", deserialize_with = "file_or_unknown")]
    pub file: String,

    #[serde(default = "unknown_project", deserialize_with = "project_or_unknown")]
    pub project: String,

    /// `None` only when read back from a summary row without a usable status
    #[serde(default, deserialize_with = "lenient")]
    pub status: Option<TestOutcome>,

    #[serde(default, deserialize_with = "count")]
    pub duration_ms: u64,

    /// Zero-based retry attempt (0 = first attempt)
    #[serde(rename = "retry", default, deserialize_with = "lenient")]
    pub retry_index: u32,
}

impl TestRecord {
    /// Title shown in flat listings: the full path when one exists.
    pub fn display_title(&self) -> &str {
        if self.full_title.is_empty() {
            &self.title
        } else {
            &self.full_title
        }
    }
}

/// Failed attempt, derived from a `TestRecord` whose outcome is `Failed`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FailureRecord {
    #[serde(default, deserialize_with = "lenient")]
    pub title: String,

    #[serde(default = "unknown_file", deserialize_with = "file_or_unknown")]
    pub file: String,

    #[serde(default = "unknown_project", deserialize_with = "project_or_unknown")]
    pub project: String,

    #[serde(default, deserialize_with = "count")]
    pub duration_ms: u64,

    #[serde(rename = "error", default = "unknown_error", deserialize_with = "error_or_unknown")]
    pub error_message: String,
}

// ============================================================================
// Tallies
// ============================================================================

/// Outcome counts for one project.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tally {
    #[serde(default, deserialize_with = "count")]
    pub passed: u64,
    #[serde(default, deserialize_with = "count")]
    pub failed: u64,
    #[serde(default, deserialize_with = "count")]
    pub skipped: u64,
}

impl Tally {
    pub fn record(&mut self, outcome: TestOutcome) {
        match outcome {
            TestOutcome::Passed => self.passed += 1,
            TestOutcome::Failed => self.failed += 1,
            TestOutcome::Skipped => self.skipped += 1,
        }
    }

    pub fn total(&self) -> u64 {
        self.passed + self.failed + self.skipped
    }
}

/// Outcome counts for one spec file, plus the summed duration of its tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileTally {
    #[serde(default, deserialize_with = "count")]
    pub passed: u64,
    #[serde(default, deserialize_with = "count")]
    pub failed: u64,
    #[serde(default, deserialize_with = "count")]
    pub skipped: u64,
    #[serde(default, deserialize_with = "count")]
    pub duration_ms: u64,
}

impl FileTally {
    pub fn record(&mut self, outcome: TestOutcome, duration_ms: u64) {
        match outcome {
            TestOutcome::Passed => self.passed += 1,
            TestOutcome::Failed => self.failed += 1,
            TestOutcome::Skipped => self.skipped += 1,
        }
        self.duration_ms += duration_ms;
    }

    pub fn total(&self) -> u64 {
        self.passed + self.failed + self.skipped
    }
}

/// Run-level counters. `total == passed + failed + skipped` always holds
/// for totals built by the aggregator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Totals {
    #[serde(default, deserialize_with = "count")]
    pub total: u64,
    #[serde(default, deserialize_with = "count")]
    pub passed: u64,
    #[serde(default, deserialize_with = "count")]
    pub failed: u64,
    #[serde(default, deserialize_with = "count")]
    pub skipped: u64,
}

impl Totals {
    pub fn record(&mut self, outcome: TestOutcome) {
        self.total += 1;
        match outcome {
            TestOutcome::Passed => self.passed += 1,
            TestOutcome::Failed => self.failed += 1,
            TestOutcome::Skipped => self.skipped += 1,
        }
    }
}

// ============================================================================
// Run summary (learning-summary.json)
// ============================================================================

/// Aggregated view of a whole run, persisted as `learning-summary.json`.
///
/// Created empty at run start, updated once per completed attempt and
/// stamped with `generated_at` when the run ends. Reading it back is lenient:
/// any field that is missing or malformed resolves to its default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    /// RFC 3339 timestamp of finalization; `None` until the run ends
    #[serde(default, deserialize_with = "non_empty_string")]
    pub generated_at: Option<String>,

    #[serde(default, deserialize_with = "lenient")]
    pub totals: Totals,

    /// Wall-clock span of the run, not the sum of test durations
    #[serde(default, deserialize_with = "count")]
    pub duration_ms: u64,

    #[serde(default, deserialize_with = "lenient_map")]
    pub by_project: IndexMap<String, Tally>,

    #[serde(default, deserialize_with = "lenient_map")]
    pub by_file: IndexMap<String, FileTally>,

    #[serde(default, deserialize_with = "lenient_vec")]
    pub failures: Vec<FailureRecord>,

    #[serde(default, deserialize_with = "lenient_vec")]
    pub tests: Vec<TestRecord>,
}

impl RunSummary {
    /// Fold one normalized attempt into every counter and list.
    pub fn record(&mut self, mut record: TestRecord, error: Option<String>) {
        let outcome = record.status.unwrap_or_default();
        record.status = Some(outcome);

        self.totals.record(outcome);
        self.by_project
            .entry(record.project.clone())
            .or_default()
            .record(outcome);
        self.by_file
            .entry(record.file.clone())
            .or_default()
            .record(outcome, record.duration_ms);

        if outcome == TestOutcome::Failed {
            self.failures.push(FailureRecord {
                title: record.title.clone(),
                file: record.file.clone(),
                project: record.project.clone(),
                duration_ms: record.duration_ms,
                error_message: error.unwrap_or_else(unknown_error),
            });
        }

        self.tests.push(record);
    }
}

// Serde default helpers
fn unknown_file() -> String { UNKNOWN_FILE.to_string() }
fn unknown_project() -> String { UNKNOWN_PROJECT.to_string() }
fn unknown_error() -> String { UNKNOWN_ERROR.to_string() }

fn file_or_unknown<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(non_empty_string(d)?.unwrap_or_else(unknown_file))
}

fn project_or_unknown<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(non_empty_string(d)?.unwrap_or_else(unknown_project))
}

fn error_or_unknown<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(non_empty_string(d)?.unwrap_or_else(unknown_error))
}
