use crate::summary::summary_model::RunSummary;

// ============================================================================
// Console summary - end-of-run totals block
// ============================================================================

/// Format the totals block printed once a run has been summarized.
///
/// ```text
/// ===== Learning Summary =====
/// Total  : 5
/// Passed : 2
/// Failed : 2
/// Skipped: 1
/// Duration: 1.2s
///
///     [FAIL] logs in (chromium) - Error: expected 200
/// ============================
/// ```
pub fn format_console_summary(summary: &RunSummary) -> String {
    let totals = &summary.totals;
    let mut out = String::new();

    out.push_str("===== Learning Summary =====\n");
    out.push_str(&format!("Total  : {}\n", totals.total));
    out.push_str(&format!("Passed : {}\n", totals.passed));
    out.push_str(&format!("Failed : {}\n", totals.failed));
    out.push_str(&format!("Skipped: {}\n", totals.skipped));
    out.push_str(&format!(
        "Duration: {:.1}s\n",
        summary.duration_ms as f64 / 1000.0
    ));

    if !summary.failures.is_empty() {
        out.push('\n');
        for failure in &summary.failures {
            out.push_str(&format!(
                "    [FAIL] {} ({}) - {}\n",
                failure.title, failure.project, failure.error_message
            ));
        }
    }

    out.push_str("============================\n");
    out
}
