use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "learning-dashboard",
    version,
    about = "Summarize Playwright runs and render a static HTML dashboard"
)]
pub struct Cli {
    /// Defaults to `render` when omitted
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config file (default: learning-dashboard.yaml in the root)
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Directory that relative artifact paths are resolved against
    #[arg(long, global = true)]
    pub root: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render the HTML dashboard from results.json and learning-summary.json
    Render {
        /// Engine results file
        #[arg(long)]
        results: Option<String>,

        /// Learning summary file
        #[arg(long)]
        summary: Option<String>,

        /// Dashboard output file
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Build learning-summary.json from a reporter event stream or a results file
    Aggregate {
        /// JSON-lines file of runStart / testComplete / runEnd events
        #[arg(long, conflicts_with = "from_results", required_unless_present = "from_results")]
        events: Option<String>,

        /// Replay an engine results.json instead of an event stream
        #[arg(long)]
        from_results: Option<String>,

        /// Summary output file
        #[arg(short, long)]
        output: Option<String>,
    },
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

pub const DEFAULT_CONFIG_FILE: &str = "learning-dashboard.yaml";

/// Optional YAML config file: `learning-dashboard.yaml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub paths: PathsConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathsConfig {
    #[serde(default = "default_results")]
    pub results: String,

    #[serde(default = "default_summary")]
    pub summary: String,

    #[serde(default = "default_dashboard")]
    pub dashboard: String,
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            results: default_results(),
            summary: default_summary(),
            dashboard: default_dashboard(),
        }
    }
}

// Serde default helpers
fn default_results() -> String { "test-results/results.json".to_string() }
fn default_summary() -> String { "test-results/learning-summary.json".to_string() }
fn default_dashboard() -> String { "playwright-report/learning-dashboard.html".to_string() }

// ============================================================================
// Config File Loading
// ============================================================================

/// Load config from a YAML file. Returns defaults if file is missing or malformed.
pub fn load_config(path: &Path) -> AppConfig {
    match std::fs::read_to_string(path) {
        Ok(content) => serde_yaml::from_str(&content).unwrap_or_else(|e| {
            tracing::warn!("ignoring malformed config {}: {}", path.display(), e);
            AppConfig::default()
        }),
        Err(_) => AppConfig::default(),
    }
}

// ============================================================================
// Path Resolution (CLI > config file > defaults)
// ============================================================================

/// Artifact locations after merging CLI flags with the config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    pub results: PathBuf,
    pub summary: PathBuf,
    pub dashboard: PathBuf,
}

/// Per-invocation overrides; `None` falls through to the config file.
#[derive(Debug, Clone, Default)]
pub struct PathOverrides<'a> {
    pub results: Option<&'a str>,
    pub summary: Option<&'a str>,
    pub dashboard: Option<&'a str>,
}

pub fn resolve_paths(root: &Path, config: &AppConfig, overrides: &PathOverrides<'_>) -> ArtifactPaths {
    let pick = |flag: Option<&str>, configured: &str| root.join(flag.unwrap_or(configured));
    ArtifactPaths {
        results: pick(overrides.results, &config.paths.results),
        summary: pick(overrides.summary, &config.paths.summary),
        dashboard: pick(overrides.dashboard, &config.paths.dashboard),
    }
}
