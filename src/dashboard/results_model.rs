use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::reporter::events::RawStatus;
use crate::summary::lenient::{lenient, lenient_vec, non_empty_string, value_to_u64};

// ============================================================================
// Engine results tree (results.json)
// ============================================================================

/// The execution engine's own JSON report. Only the fields the dashboard
/// and the replay read are modelled; every one of them is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawResults {
    #[serde(default, deserialize_with = "lenient_vec")]
    pub suites: Vec<SuiteNode>,

    #[serde(default, deserialize_with = "lenient")]
    pub stats: Option<RunStats>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunStats {
    #[serde(default)]
    pub duration: Value,
}

impl RunStats {
    pub fn duration_ms(&self) -> u64 {
        value_to_u64(&self.duration)
    }
}

/// A describe block (or the file-level root) holding specs and child suites.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SuiteNode {
    #[serde(default, deserialize_with = "lenient")]
    pub title: String,

    #[serde(default, deserialize_with = "non_empty_string")]
    pub file: Option<String>,

    #[serde(default, deserialize_with = "lenient_vec")]
    pub specs: Vec<SpecLeaf>,

    #[serde(default, deserialize_with = "lenient_vec")]
    pub suites: Vec<SuiteNode>,
}

/// A single test declaration; `tests` has one entry per project it ran in.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpecLeaf {
    #[serde(default, deserialize_with = "lenient")]
    pub title: String,

    #[serde(default, deserialize_with = "non_empty_string")]
    pub file: Option<String>,

    #[serde(default, deserialize_with = "lenient_vec")]
    pub tests: Vec<SpecTest>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpecTest {
    #[serde(default, deserialize_with = "non_empty_string")]
    pub project_name: Option<String>,

    #[serde(default, deserialize_with = "lenient_vec")]
    pub results: Vec<SpecAttempt>,
}

/// One attempt of a test in one project.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SpecAttempt {
    #[serde(default, deserialize_with = "lenient")]
    pub status: RawStatus,

    #[serde(default, deserialize_with = "lenient")]
    pub duration: f64,

    #[serde(default, deserialize_with = "lenient")]
    pub retry: u32,

    #[serde(default, deserialize_with = "lenient")]
    pub error: Option<AttemptError>,

    #[serde(default, deserialize_with = "lenient_vec")]
    pub errors: Vec<AttemptError>,
}

impl SpecAttempt {
    pub fn first_error(&self) -> Option<&str> {
        self.error
            .iter()
            .chain(self.errors.iter())
            .find_map(|e| e.message.as_deref())
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AttemptError {
    #[serde(default, deserialize_with = "non_empty_string")]
    pub message: Option<String>,
}

// ============================================================================
// Tree walk
// ============================================================================

/// A node of the results tree: either a suite with children or a spec leaf.
#[derive(Debug, Clone, Copy)]
pub enum ResultNode<'a> {
    Suite(&'a SuiteNode),
    Spec(&'a SpecLeaf),
}

impl SuiteNode {
    /// Specs first, then child suites, each in document order.
    pub fn children(&self) -> impl DoubleEndedIterator<Item = ResultNode<'_>> {
        self.specs
            .iter()
            .map(ResultNode::Spec)
            .chain(self.suites.iter().map(ResultNode::Suite))
    }
}

/// A spec leaf together with the titles and file of the suites above it.
#[derive(Debug, Clone)]
pub struct SpecEntry<'a> {
    /// Suite titles from the root down, root suite included
    pub path: Vec<&'a str>,
    pub suite_file: Option<&'a str>,
    pub spec: &'a SpecLeaf,
}

impl<'a> SpecEntry<'a> {
    /// The spec's own file, else the nearest suite's file.
    pub fn file(&self) -> Option<&'a str> {
        self.spec.file.as_deref().or(self.suite_file)
    }
}

/// Depth-first walk collecting every spec leaf in encounter order.
pub fn walk_specs(suites: &[SuiteNode]) -> Vec<SpecEntry<'_>> {
    let mut out = Vec::new();
    let mut stack: Vec<(Vec<&str>, Option<&str>, ResultNode<'_>)> = suites
        .iter()
        .rev()
        .map(|suite| (Vec::new(), None, ResultNode::Suite(suite)))
        .collect();

    while let Some((path, suite_file, node)) = stack.pop() {
        match node {
            ResultNode::Spec(spec) => out.push(SpecEntry {
                path,
                suite_file,
                spec,
            }),
            ResultNode::Suite(suite) => {
                let mut child_path = path;
                child_path.push(suite.title.as_str());
                let child_file = suite.file.as_deref().or(suite_file);
                for child in suite.children().rev() {
                    stack.push((child_path.clone(), child_file, child));
                }
            }
        }
    }

    out
}

/// Every spec leaf in the tree, depth-first.
pub fn flatten_specs(suites: &[SuiteNode]) -> Vec<&SpecLeaf> {
    walk_specs(suites).into_iter().map(|entry| entry.spec).collect()
}
