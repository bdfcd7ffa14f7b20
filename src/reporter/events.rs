use serde::{Deserialize, Serialize};

use crate::summary::summary_model::{TestRecord, UNKNOWN_FILE, UNKNOWN_PROJECT};

/// Separator used when joining a describe-block path into a full title.
pub const TITLE_SEPARATOR: &str = " \u{203a} ";

// ============================================================================
// Raw engine status
// ============================================================================

/// Status exactly as the execution engine reports it, before normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[derive(Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RawStatus {
    Passed,
    Failed,
    TimedOut,
    Skipped,
    Interrupted,
    #[default]
    Unknown,
}

impl From<String> for RawStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "passed" => RawStatus::Passed,
            "failed" => RawStatus::Failed,
            "timedOut" => RawStatus::TimedOut,
            "skipped" => RawStatus::Skipped,
            "interrupted" => RawStatus::Interrupted,
            _ => RawStatus::Unknown,
        }
    }
}

impl From<RawStatus> for String {
    fn from(status: RawStatus) -> Self {
        match status {
            RawStatus::Passed => "passed",
            RawStatus::Failed => "failed",
            RawStatus::TimedOut => "timedOut",
            RawStatus::Skipped => "skipped",
            RawStatus::Interrupted => "interrupted",
            RawStatus::Unknown => "unknown",
        }
        .to_string()
    }
}

// ============================================================================
// Event payloads
// ============================================================================

/// Identity of a test, independent of which attempt is being reported.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestIdentity {
    pub title: String,

    /// Enclosing describe-block titles, outermost first (excluding `title`)
    #[serde(default)]
    pub title_path: Vec<String>,

    #[serde(default)]
    pub file: Option<String>,

    #[serde(default)]
    pub project: Option<String>,
}

impl TestIdentity {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn with_path<I, S>(mut self, path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.title_path = path.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    pub fn with_project(mut self, project: impl Into<String>) -> Self {
        self.project = Some(project.into());
        self
    }

    /// Describe-block path joined with the title, or just the title.
    pub fn full_title(&self) -> String {
        let segments: Vec<&str> = self
            .title_path
            .iter()
            .map(String::as_str)
            .filter(|s| !s.is_empty())
            .collect();
        if segments.is_empty() {
            return self.title.clone();
        }
        let mut full = segments.join(TITLE_SEPARATOR);
        full.push_str(TITLE_SEPARATOR);
        full.push_str(&self.title);
        full
    }
}

/// Outcome of one attempt as delivered by the engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestResultInfo {
    pub status: RawStatus,

    /// Measured duration; may be absent, fractional or negative
    #[serde(default)]
    pub duration_ms: Option<f64>,

    #[serde(default)]
    pub retry: u32,

    #[serde(default)]
    pub error: Option<String>,
}

impl TestResultInfo {
    pub fn new(status: RawStatus) -> Self {
        Self {
            status,
            ..Self::default()
        }
    }

    pub fn with_duration(mut self, duration_ms: f64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    pub fn with_retry(mut self, retry: u32) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    /// Duration clamped to a non-negative whole number of milliseconds.
    pub fn resolved_duration_ms(&self) -> u64 {
        match self.duration_ms {
            Some(ms) if ms.is_finite() && ms > 0.0 => ms.round() as u64,
            _ => 0,
        }
    }

    /// First meaningful line of the error, with terminal escape codes removed.
    pub fn primary_error(&self) -> Option<String> {
        let raw = self.error.as_deref()?;
        let cleaned = strip_ansi_escapes::strip_str(raw);
        cleaned
            .lines()
            .map(str::trim)
            .find(|line| !line.is_empty())
            .map(str::to_string)
    }
}

/// Resolve an event pair into the record stored in the summary.
pub fn to_record(test: &TestIdentity, result: &TestResultInfo) -> TestRecord {
    TestRecord {
        title: test.title.clone(),
        full_title: test.full_title(),
        file: non_empty_or(test.file.as_deref(), UNKNOWN_FILE),
        project: non_empty_or(test.project.as_deref(), UNKNOWN_PROJECT),
        status: Some(result.status.into()),
        duration_ms: result.resolved_duration_ms(),
        retry_index: result.retry,
    }
}

fn non_empty_or(value: Option<&str>, fallback: &str) -> String {
    match value {
        Some(v) if !v.is_empty() => v.to_string(),
        _ => fallback.to_string(),
    }
}

// ============================================================================
// Event stream
// ============================================================================

/// One lifecycle event from the execution engine.
///
/// Serialized with an `event` tag, one object per line:
/// ```text
/// {"event":"runStart","testCount":2}
/// {"event":"testComplete","test":{"title":"loads"},"result":{"status":"passed","durationMs":12}}
/// {"event":"runEnd"}
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum ReporterEvent {
    RunStart {
        #[serde(rename = "testCount", default)]
        test_count: usize,
    },
    TestComplete {
        test: TestIdentity,
        result: TestResultInfo,
    },
    RunEnd,
}
