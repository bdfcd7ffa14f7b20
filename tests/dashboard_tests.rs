mod common;

use common::utils::{identity, result, sample_results, write_json};
use indexmap::IndexMap;
use learning_dashboard::dashboard::dashboard_model::DashboardModel;
use learning_dashboard::dashboard::render::{render, render_dashboard, render_to_file};
use learning_dashboard::dashboard::results_model::RawResults;
use learning_dashboard::error::DashboardError;
use learning_dashboard::reporter::aggregator::SummaryAggregator;
use learning_dashboard::reporter::events::RawStatus;
use learning_dashboard::summary::summary_model::{FileTally, RunSummary, Totals};
use serde_json::json;

fn empty_summary_json() -> serde_json::Value {
    json!({
        "generatedAt": "2026-01-01T00:00:00.000Z",
        "totals": { "total": 0, "passed": 0, "failed": 0, "skipped": 0 },
        "durationMs": 0,
        "byProject": {},
        "byFile": {},
        "failures": [],
        "tests": []
    })
}

fn mixed_summary_json() -> serde_json::Value {
    json!({
        "generatedAt": "2026-01-02T10:00:00.000Z",
        "totals": { "total": 4, "passed": 2, "failed": 1, "skipped": 1 },
        "durationMs": 1500,
        "byProject": {
            "chromium": { "passed": 2, "failed": 1, "skipped": 0 },
            "firefox": { "passed": 0, "failed": 0, "skipped": 1 }
        },
        "byFile": {
            "b.spec.js": { "passed": 1, "failed": 1, "skipped": 0, "durationMs": 300 },
            "a.spec.js": { "passed": 1, "failed": 0, "skipped": 1, "durationMs": 40 }
        },
        "failures": [
            { "title": "<script>alert(1)</script>", "file": "b.spec.js", "project": "chromium",
              "durationMs": 200, "error": "expected \"a\" & got <b>" }
        ],
        "tests": [
            { "title": "first", "fullTitle": "B \u{203a} first", "file": "b.spec.js", "project": "chromium", "status": "passed", "durationMs": 100, "retry": 0 },
            { "title": "<script>alert(1)</script>", "fullTitle": "", "file": "b.spec.js", "project": "chromium", "status": "failed", "durationMs": 200, "retry": 0 },
            { "title": "second", "fullTitle": "second", "file": "a.spec.js", "project": "chromium", "status": "passed", "durationMs": 40, "retry": 0 },
            { "title": "third", "fullTitle": "third", "file": "a.spec.js", "project": "firefox", "status": "skipped", "durationMs": 0, "retry": 0 }
        ]
    })
}

// ============================================================================
// 1. Missing artifacts
// ============================================================================

#[test]
fn missing_results_is_fatal_and_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let summary = write_json(dir.path(), "learning-summary.json", &empty_summary_json());
    let results = dir.path().join("results.json");
    let output = dir.path().join("report").join("learning-dashboard.html");

    let err = render_to_file(&results, &summary, &output).unwrap_err();
    match err {
        DashboardError::MissingArtifact { path } => assert_eq!(path, results),
        other => panic!("Expected MissingArtifact, got {:?}", other),
    }
    assert!(!output.exists());
    assert!(!output.parent().unwrap().exists());
}

#[test]
fn missing_summary_leaves_existing_dashboard_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let results = write_json(dir.path(), "results.json", &sample_results());
    let summary = dir.path().join("learning-summary.json");
    let output = dir.path().join("learning-dashboard.html");
    std::fs::write(&output, "previous dashboard").unwrap();

    let err = render_to_file(&results, &summary, &output).unwrap_err();
    assert!(matches!(err, DashboardError::MissingArtifact { .. }));
    assert!(err.to_string().contains("learning-summary.json"));
    assert_eq!(std::fs::read_to_string(&output).unwrap(), "previous dashboard");
}

// ============================================================================
// 2. Empty run
// ============================================================================

#[test]
fn empty_run_renders_placeholders() {
    let dir = tempfile::tempdir().unwrap();
    let results = write_json(dir.path(), "results.json", &json!({ "suites": [] }));
    let summary = write_json(dir.path(), "learning-summary.json", &empty_summary_json());

    let html = render(&results, &summary).unwrap();
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.trim_end().ends_with("</html>"));
    assert!(html.contains("No failures"));
    assert!(html.contains("No test list data"));
    assert!(html.contains("No file data"));
    assert!(html.contains("No spec grouping data"));
    assert!(html.contains("<div>No data</div>"));
    assert!(html.contains("Pass 0.0%"));
    assert!(html.contains("Fail 0.0%"));
    assert!(html.contains("Skip 0.0%"));
    assert!(html.contains("Total specs in JSON: 0"));
}

#[test]
fn dashboard_is_self_contained() {
    let summary: RunSummary = serde_json::from_value(mixed_summary_json()).unwrap();
    let html = render_dashboard(&summary, &RawResults::default());
    assert!(!html.contains("<script src"));
    assert!(!html.contains("<link"));
    assert!(!html.contains("http://"));
    assert!(!html.contains("https://"));
    assert!(html.contains("conic-gradient("));
}

// ============================================================================
// 3. Derived values
// ============================================================================

#[test]
fn percentages_and_pie_boundaries() {
    let summary: RunSummary = serde_json::from_value(mixed_summary_json()).unwrap();
    let html = render_dashboard(&summary, &RawResults::default());
    assert!(html.contains("Pass 50.0%"));
    assert!(html.contains("Fail 25.0%"));
    assert!(html.contains("Skip 25.0%"));
    assert!(html.contains("#22c55e 0 50.0%, #ef4444 50.0% 75.0%, #f59e0b 75.0% 100%"));
}

#[test]
fn project_cards_use_local_proportions() {
    let summary: RunSummary = serde_json::from_value(mixed_summary_json()).unwrap();
    let results = RawResults::default();
    let model = DashboardModel::derive(&summary, &results);

    assert_eq!(model.projects.len(), 2);
    assert_eq!(model.projects[0].name, "chromium");
    assert_eq!(model.projects[0].split.passed, 66.7);
    assert_eq!(model.projects[0].split.failed, 33.3);
    assert_eq!(model.projects[1].split.skipped, 100.0);

    let html = render_dashboard(&summary, &results);
    assert!(html.contains("P:2 F:1 S:0"));
    assert!(html.contains("width:66.7%"));
}

#[test]
fn files_sorted_by_duration_descending() {
    let mut by_file = IndexMap::new();
    for (file, duration_ms) in [("medium.spec.js", 50), ("slow.spec.js", 500), ("fast.spec.js", 10)] {
        by_file.insert(
            file.to_string(),
            FileTally { passed: 1, duration_ms, ..FileTally::default() },
        );
    }
    let summary = RunSummary {
        totals: Totals { total: 3, passed: 3, ..Totals::default() },
        by_file,
        ..RunSummary::default()
    };

    let html = render_dashboard(&summary, &RawResults::default());
    let slow = html.find("<td>slow.spec.js</td>").unwrap();
    let medium = html.find("<td>medium.spec.js</td>").unwrap();
    let fast = html.find("<td>fast.spec.js</td>").unwrap();
    assert!(slow < medium && medium < fast);
}

#[test]
fn equal_durations_keep_insertion_order() {
    let summary: RunSummary = serde_json::from_value(json!({
        "byFile": {
            "z.spec.js": { "durationMs": 10 },
            "a.spec.js": { "durationMs": 10 },
            "m.spec.js": { "durationMs": 20 }
        }
    }))
    .unwrap();
    let results = RawResults::default();
    let model = DashboardModel::derive(&summary, &results);
    let files: Vec<&str> = model.files.iter().map(|f| f.file).collect();
    assert_eq!(files, vec!["m.spec.js", "z.spec.js", "a.spec.js"]);
}

#[test]
fn spec_groups_sorted_by_path_with_local_counts() {
    let summary: RunSummary = serde_json::from_value(mixed_summary_json()).unwrap();
    let results = RawResults::default();
    let model = DashboardModel::derive(&summary, &results);

    assert_eq!(model.spec_groups.len(), 2);
    let a = &model.spec_groups[0];
    assert_eq!(a.file, "a.spec.js");
    assert_eq!((a.tests.len(), a.passed, a.failed, a.skipped), (2, 1, 0, 1));
    let b = &model.spec_groups[1];
    assert_eq!(b.file, "b.spec.js");
    assert_eq!((b.tests.len(), b.passed, b.failed, b.skipped), (2, 1, 1, 0));

    let html = render_dashboard(&summary, &results);
    assert_eq!(html.matches("<details class=\"spec-details\">").count(), 2);
}

#[test]
fn duration_falls_back_to_results_stats() {
    let mut summary_json = mixed_summary_json();
    summary_json["durationMs"] = json!(0);
    let summary: RunSummary = serde_json::from_value(summary_json).unwrap();
    let results: RawResults = serde_json::from_value(sample_results()).unwrap();

    let model = DashboardModel::derive(&summary, &results);
    assert_eq!(model.duration_ms, 6123);
    assert_eq!(model.spec_count, 3);

    let html = render_dashboard(&summary, &results);
    assert!(html.contains("<div class=\"big\">6123</div>"));
    assert!(html.contains("Total specs in JSON: 3"));
}

#[test]
fn test_table_prefers_full_title() {
    let summary: RunSummary = serde_json::from_value(mixed_summary_json()).unwrap();
    let html = render_dashboard(&summary, &RawResults::default());
    assert!(html.contains("<td>B \u{203a} first</td>"));
    assert!(html.contains("Test names run (4)"));
}

// ============================================================================
// 4. Escaping and degradation
// ============================================================================

#[test]
fn user_strings_are_escaped() {
    let summary: RunSummary = serde_json::from_value(mixed_summary_json()).unwrap();
    let html = render_dashboard(&summary, &RawResults::default());
    assert!(!html.contains("<script>"));
    assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    assert!(html.contains("expected &quot;a&quot; &amp; got &lt;b&gt;"));
}

#[test]
fn malformed_summary_renders_with_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let results = write_json(dir.path(), "results.json", &sample_results());
    let summary = dir.path().join("learning-summary.json");
    std::fs::write(&summary, "{ this is not json").unwrap();

    let html = render(&results, &summary).unwrap();
    assert!(html.contains("Generated: n/a"));
    assert!(html.contains("No test list data"));
    assert!(html.contains("Total specs in JSON: 3"));
}

#[test]
fn malformed_fields_default_individually() {
    let summary: RunSummary = serde_json::from_value(json!({
        "generatedAt": 17,
        "totals": "lots",
        "durationMs": -5,
        "byProject": { "chromium": "broken", "firefox": { "passed": 2.0, "failed": "x" } },
        "byFile": [],
        "failures": [{ "title": "kept" }, 3],
        "tests": [{ "title": "t", "status": 9 }]
    }))
    .unwrap();

    assert_eq!(summary.generated_at, None);
    assert_eq!(summary.totals, Totals::default());
    assert_eq!(summary.duration_ms, 0);
    assert_eq!(summary.by_project["chromium"].total(), 0);
    assert_eq!(summary.by_project["firefox"].passed, 2);
    assert!(summary.by_file.is_empty());
    assert_eq!(summary.failures.len(), 1);
    assert_eq!(summary.failures[0].error_message, "Unknown error");
    assert_eq!(summary.failures[0].file, "unknown-file");
    assert_eq!(summary.tests[0].project, "unknown");
    assert_eq!(summary.tests[0].status, None);

    let html = render_dashboard(&summary, &RawResults::default());
    assert!(html.contains("Pass 0.0%"));
}

#[test]
fn statusless_rows_are_left_out_of_spec_counts() {
    let summary: RunSummary = serde_json::from_value(json!({
        "tests": [
            { "title": "ran", "file": "a.spec.js", "status": "skipped" },
            { "title": "no status", "file": "a.spec.js" },
            { "title": "bad status", "file": "a.spec.js", "status": 3 }
        ]
    }))
    .unwrap();
    let results = RawResults::default();
    let model = DashboardModel::derive(&summary, &results);

    let group = &model.spec_groups[0];
    assert_eq!(group.tests.len(), 3);
    assert_eq!((group.passed, group.failed, group.skipped), (0, 0, 1));

    let html = render_dashboard(&summary, &results);
    assert!(html.contains("<td>no status</td><td>unknown</td><td>unknown</td>"));
}

// ============================================================================
// 5. Determinism and persistence
// ============================================================================

#[test]
fn rendering_is_deterministic() {
    let dir = tempfile::tempdir().unwrap();
    let results = write_json(dir.path(), "results.json", &sample_results());
    let summary = write_json(dir.path(), "learning-summary.json", &mixed_summary_json());
    assert_eq!(render(&results, &summary).unwrap(), render(&results, &summary).unwrap());
}

#[test]
fn render_to_file_creates_directories_and_overwrites() {
    let dir = tempfile::tempdir().unwrap();
    let results = write_json(dir.path(), "test-results/results.json", &sample_results());
    let summary = write_json(dir.path(), "test-results/learning-summary.json", &mixed_summary_json());
    let output = dir.path().join("playwright-report").join("learning-dashboard.html");

    render_to_file(&results, &summary, &output).unwrap();
    let first = std::fs::read_to_string(&output).unwrap();
    assert!(first.contains("2026-01-02T10:00:00.000Z"));

    write_json(dir.path(), "test-results/learning-summary.json", &empty_summary_json());
    render_to_file(&results, &summary, &output).unwrap();
    let second = std::fs::read_to_string(&output).unwrap();
    assert!(second.contains("No test list data"));
    assert!(!second.contains("2026-01-02T10:00:00.000Z"));
}

// ============================================================================
// 6. Aggregator -> renderer pipeline
// ============================================================================

#[test]
fn summary_written_by_aggregator_renders() {
    let dir = tempfile::tempdir().unwrap();
    let summary_path = dir.path().join("test-results").join("learning-summary.json");
    let results_path = write_json(dir.path(), "test-results/results.json", &sample_results());
    let output = dir.path().join("playwright-report").join("learning-dashboard.html");

    let mut aggregator = SummaryAggregator::new(&summary_path);
    aggregator.on_run_start(3);
    aggregator.on_test_complete(&identity("ok", "nav.spec.js", "chromium"), &result(RawStatus::Passed, 100.0));
    aggregator.on_test_complete(
        &identity("bad", "nav.spec.js", "chromium"),
        &result(RawStatus::Failed, 250.0).with_error("Error: locator not found"),
    );
    aggregator.on_test_complete(&identity("later", "forms.spec.js", "webkit"), &result(RawStatus::Skipped, 0.0));
    aggregator.on_run_end().unwrap();

    render_to_file(&results_path, &summary_path, &output).unwrap();
    let html = std::fs::read_to_string(&output).unwrap();
    assert!(html.contains("<td>nav.spec.js</td><td>1</td><td>1</td><td>0</td><td>350</td>"));
    assert!(html.contains("Error: locator not found"));
    assert!(html.contains("Test names run (3)"));
}
