use crate::dashboard::dashboard_model::{DashboardModel, FileRow, ProjectCard, SpecGroup};
use crate::summary::summary_model::{FailureRecord, TestRecord};

// ============================================================================
// HTML dashboard - self-contained, dark-themed single page
// ============================================================================

const PASS_COLOR: &str = "#22c55e";
const FAIL_COLOR: &str = "#ef4444";
const SKIP_COLOR: &str = "#f59e0b";

/// Render the dashboard page.
///
/// Sections:
/// - Header with the summary timestamp
/// - Total / passed / failed / duration tiles
/// - CSS conic-gradient pie of the status split
/// - Per-project proportional bars
/// - Failures list and slow-file table
/// - Full test table and one collapsible block per spec file
///
/// Styles are inline and nothing is loaded from the network. Every string
/// that came from a test run is escaped.
pub fn generate_dashboard_html(model: &DashboardModel<'_>) -> String {
    let split = &model.split;
    let pass_end = split.passed;
    let fail_end = split.passed + split.failed;

    let projects = if model.projects.is_empty() {
        "<div>No data</div>".to_string()
    } else {
        model.projects.iter().map(project_card).collect()
    };

    let failures = if model.failures.is_empty() {
        "<li>No failures \u{1f389}</li>".to_string()
    } else {
        model.failures.iter().map(failure_item).collect()
    };

    let file_rows = if model.files.is_empty() {
        "<tr><td colspan=\"5\">No file data</td></tr>".to_string()
    } else {
        model.files.iter().map(file_row).collect()
    };

    let test_rows = if model.tests.is_empty() {
        "<tr><td colspan=\"4\">No test list data</td></tr>".to_string()
    } else {
        model
            .tests
            .iter()
            .map(|t| test_row(t, t.display_title()))
            .collect()
    };

    let spec_blocks = if model.spec_groups.is_empty() {
        "<p>No spec grouping data</p>".to_string()
    } else {
        model.spec_groups.iter().map(spec_block).collect()
    };

    format!(
        r##"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>Playwright Learning Dashboard</title>
<style>
body {{ font-family: Arial, sans-serif; margin: 24px; background: #0f172a; color: #e2e8f0; }}
h1, h2 {{ margin: 0 0 12px; }}
.grid {{ display: grid; grid-template-columns: repeat(4, minmax(120px, 1fr)); gap: 12px; margin: 16px 0; }}
.card {{ background: #1e293b; padding: 12px; border-radius: 10px; }}
.big {{ font-size: 24px; font-weight: bold; }}
.layout {{ display: grid; grid-template-columns: 320px 1fr; gap: 16px; margin: 20px 0; }}
.panel {{ background: #1e293b; padding: 14px; border-radius: 10px; margin-bottom: 16px; }}
.pie {{ width: 220px; height: 220px; border-radius: 50%; margin: 10px auto; background: conic-gradient({pass_color} 0 {pass_end:.1}%, {fail_color} {pass_end:.1}% {fail_end:.1}%, {skip_color} {fail_end:.1}% 100%); }}
.legend span {{ display: inline-block; margin-right: 10px; }}
.dot {{ width: 10px; height: 10px; border-radius: 50%; display: inline-block; margin-right: 5px; }}
.project-wrap {{ display: grid; grid-template-columns: repeat(3, minmax(180px, 1fr)); gap: 10px; }}
.project-card {{ background: #334155; padding: 10px; border-radius: 8px; }}
.bar {{ height: 8px; background: #0f172a; border-radius: 8px; margin: 6px 0; overflow: hidden; }}
.bar span {{ display: block; height: 100%; }}
.pass {{ background: {pass_color}; }}
.fail {{ background: {fail_color}; }}
.skip {{ background: {skip_color}; }}
table {{ width: 100%; border-collapse: collapse; }}
th, td {{ border-bottom: 1px solid #334155; padding: 8px; text-align: left; }}
ul {{ margin: 0; padding-left: 18px; }}
.spec-details {{ background: #1e293b; border-radius: 8px; padding: 8px 10px; margin-bottom: 10px; }}
.spec-details summary {{ cursor: pointer; display: flex; justify-content: space-between; gap: 10px; list-style: none; }}
.spec-details summary::-webkit-details-marker {{ display: none; }}
.spec-title {{ font-weight: 600; }}
.spec-meta {{ color: #94a3b8; font-size: 12px; }}
</style>
</head>
<body>
<h1>Playwright Learning Dashboard</h1>
<p>Generated: {generated_at}</p>

<div class="grid">
<div class="card"><div>Total</div><div class="big">{total}</div></div>
<div class="card"><div>Passed</div><div class="big">{passed}</div></div>
<div class="card"><div>Failed</div><div class="big">{failed}</div></div>
<div class="card"><div>Duration (ms)</div><div class="big">{duration}</div></div>
</div>

<div class="layout">
<div class="panel">
<h2>Status split</h2>
<div class="pie"></div>
<div class="legend">
<span><i class="dot" style="background:{pass_color}"></i>Pass {pass_pct:.1}%</span>
<span><i class="dot" style="background:{fail_color}"></i>Fail {fail_pct:.1}%</span>
<span><i class="dot" style="background:{skip_color}"></i>Skip {skip_pct:.1}%</span>
</div>
</div>
<div class="panel">
<h2>By project</h2>
<div class="project-wrap">{projects}</div>
</div>
</div>

<div class="layout">
<div class="panel">
<h2>Failures</h2>
<ul>{failures}</ul>
</div>
<div class="panel">
<h2>Slow files (duration)</h2>
<table>
<thead><tr><th>File</th><th>Pass</th><th>Fail</th><th>Skip</th><th>Duration ms</th></tr></thead>
<tbody>{file_rows}</tbody>
</table>
<p>Total specs in JSON: {spec_count}</p>
</div>
</div>

<div class="panel">
<h2>Test names run ({test_count})</h2>
<table>
<thead><tr><th>Test</th><th>Project</th><th>Status</th><th>Duration ms</th></tr></thead>
<tbody>{test_rows}</tbody>
</table>
</div>

<div class="panel">
<h2>Specs (expand to view tests)</h2>
{spec_blocks}
</div>
</body>
</html>
"##,
        pass_color = PASS_COLOR,
        fail_color = FAIL_COLOR,
        skip_color = SKIP_COLOR,
        pass_end = pass_end,
        fail_end = fail_end,
        generated_at = escape_html(model.generated_at.unwrap_or("n/a")),
        total = model.totals.total,
        passed = model.totals.passed,
        failed = model.totals.failed,
        duration = model.duration_ms,
        pass_pct = split.passed,
        fail_pct = split.failed,
        skip_pct = split.skipped,
        projects = projects,
        failures = failures,
        file_rows = file_rows,
        spec_count = model.spec_count,
        test_count = model.tests.len(),
        test_rows = test_rows,
        spec_blocks = spec_blocks,
    )
}

fn project_card(card: &ProjectCard<'_>) -> String {
    format!(
        r#"<div class="project-card">
<h3>{name}</h3>
<div class="bar"><span style="width:{pass:.1}%" class="pass"></span></div>
<div class="bar"><span style="width:{fail:.1}%" class="fail"></span></div>
<div class="bar"><span style="width:{skip:.1}%" class="skip"></span></div>
<p>P:{passed} F:{failed} S:{skipped}</p>
</div>
"#,
        name = escape_html(card.name),
        pass = card.split.passed,
        fail = card.split.failed,
        skip = card.split.skipped,
        passed = card.tally.passed,
        failed = card.tally.failed,
        skipped = card.tally.skipped,
    )
}

fn failure_item(failure: &FailureRecord) -> String {
    format!(
        "<li><strong>{}</strong> <em>({})</em><br/><small>{}</small><br/>{}</li>\n",
        escape_html(&failure.title),
        escape_html(&failure.project),
        escape_html(&failure.file),
        escape_html(&failure.error_message),
    )
}

fn file_row(row: &FileRow<'_>) -> String {
    format!(
        "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
        escape_html(row.file),
        row.tally.passed,
        row.tally.failed,
        row.tally.skipped,
        row.tally.duration_ms,
    )
}

fn test_row(test: &TestRecord, title: &str) -> String {
    format!(
        "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>\n",
        escape_html(title),
        escape_html(&test.project),
        test.status.map(|s| s.as_str()).unwrap_or("unknown"),
        test.duration_ms,
    )
}

fn spec_block(group: &SpecGroup<'_>) -> String {
    let rows: String = group.tests.iter().map(|t| test_row(t, &t.title)).collect();
    format!(
        r#"<details class="spec-details">
<summary>
<span class="spec-title">{file}</span>
<span class="spec-meta">Total: {total} | &#x2705; {passed} | &#x274c; {failed} | &#x23ed; {skipped}</span>
</summary>
<table>
<thead><tr><th>Test</th><th>Project</th><th>Status</th><th>Duration ms</th></tr></thead>
<tbody>{rows}</tbody>
</table>
</details>
"#,
        file = escape_html(group.file),
        total = group.tests.len(),
        passed = group.passed,
        failed = group.failed,
        skipped = group.skipped,
        rows = rows,
    )
}

/// Escape HTML special characters.
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_html_covers_markup_characters() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
    }
}
