use std::collections::BTreeMap;

use crate::dashboard::results_model::{RawResults, flatten_specs};
use crate::summary::summary_model::{
    FailureRecord, FileTally, RunSummary, Tally, TestOutcome, TestRecord, Totals,
};

// ============================================================================
// Derived view of a finished run
// ============================================================================

/// Pass/fail/skip percentages, each rounded to one decimal place.
///
/// Rounded independently, so the three values need not sum to exactly 100.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StatusSplit {
    pub passed: f64,
    pub failed: f64,
    pub skipped: f64,
}

impl StatusSplit {
    /// Percentages over `total`, where a zero total is treated as 1.
    pub fn of(passed: u64, failed: u64, skipped: u64, total: u64) -> Self {
        let denominator = total.max(1) as f64;
        let pct = |n: u64| round_one_decimal(n as f64 / denominator * 100.0);
        Self {
            passed: pct(passed),
            failed: pct(failed),
            skipped: pct(skipped),
        }
    }
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[derive(Debug, Clone)]
pub struct ProjectCard<'a> {
    pub name: &'a str,
    pub tally: Tally,
    pub split: StatusSplit,
}

#[derive(Debug, Clone)]
pub struct FileRow<'a> {
    pub file: &'a str,
    pub tally: FileTally,
}

/// Tests of one spec file, with local outcome counts.
#[derive(Debug, Clone)]
pub struct SpecGroup<'a> {
    pub file: &'a str,
    pub tests: Vec<&'a TestRecord>,
    pub passed: usize,
    pub failed: usize,
    pub skipped: usize,
}

/// Everything the HTML template needs, computed once from the two inputs.
#[derive(Debug, Clone)]
pub struct DashboardModel<'a> {
    pub generated_at: Option<&'a str>,
    pub totals: Totals,
    pub duration_ms: u64,
    pub split: StatusSplit,
    pub projects: Vec<ProjectCard<'a>>,
    /// Sorted by duration, slowest first
    pub files: Vec<FileRow<'a>>,
    pub failures: &'a [FailureRecord],
    pub tests: &'a [TestRecord],
    /// Sorted by file path
    pub spec_groups: Vec<SpecGroup<'a>>,
    /// Number of spec leaves in the engine's results tree
    pub spec_count: usize,
}

impl<'a> DashboardModel<'a> {
    pub fn derive(summary: &'a RunSummary, results: &'a RawResults) -> Self {
        let totals = summary.totals;

        let duration_ms = if summary.duration_ms > 0 {
            summary.duration_ms
        } else {
            results.stats.as_ref().map(|s| s.duration_ms()).unwrap_or(0)
        };

        let split = StatusSplit::of(totals.passed, totals.failed, totals.skipped, totals.total);

        let projects = summary
            .by_project
            .iter()
            .map(|(name, tally)| ProjectCard {
                name: name.as_str(),
                tally: *tally,
                split: StatusSplit::of(tally.passed, tally.failed, tally.skipped, tally.total()),
            })
            .collect();

        let mut files: Vec<FileRow<'a>> = summary
            .by_file
            .iter()
            .map(|(file, tally)| FileRow { file: file.as_str(), tally: *tally })
            .collect();
        // sort_by is stable: equal durations keep insertion order
        files.sort_by(|a, b| b.tally.duration_ms.cmp(&a.tally.duration_ms));

        Self {
            generated_at: summary.generated_at.as_deref(),
            totals,
            duration_ms,
            split,
            projects,
            files,
            failures: &summary.failures,
            tests: &summary.tests,
            spec_groups: group_by_spec(&summary.tests),
            spec_count: flatten_specs(&results.suites).len(),
        }
    }
}

/// Regroup tests by file, groups ordered by path, tests in run order.
pub fn group_by_spec(tests: &[TestRecord]) -> Vec<SpecGroup<'_>> {
    let mut grouped: BTreeMap<&str, Vec<&TestRecord>> = BTreeMap::new();
    for test in tests {
        grouped.entry(test.file.as_str()).or_default().push(test);
    }

    grouped
        .into_iter()
        .map(|(file, tests)| {
            let count = |outcome: TestOutcome| tests.iter().filter(|t| t.status == Some(outcome)).count();
            SpecGroup {
                file,
                passed: count(TestOutcome::Passed),
                failed: count(TestOutcome::Failed),
                skipped: count(TestOutcome::Skipped),
                tests,
            }
        })
        .collect()
}
