//! Error types for the reporter and the dashboard renderer

use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ReporterError {
    #[error("could not create summary directory {}: {source}", .path.display())]
    CreateDir { path: PathBuf, source: io::Error },

    #[error("could not serialize run summary: {0}")]
    Serialize(#[source] serde_json::Error),

    #[error("could not write run summary to {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error("could not read event stream {}: {source}", .path.display())]
    ReadEvents { path: PathBuf, source: io::Error },

    #[error("event stream line {line}: {source}")]
    EventParse { line: usize, source: serde_json::Error },

    #[error("results file {} is not valid JSON: {source}", .path.display())]
    ResultsParse { path: PathBuf, source: serde_json::Error },

    #[error("could not load results to replay: {0}")]
    Replay(#[from] DashboardError),
}

#[derive(Error, Debug)]
pub enum DashboardError {
    #[error("Missing required file: {}", .path.display())]
    MissingArtifact { path: PathBuf },

    #[error("could not read {}: {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("could not create dashboard directory {}: {source}", .path.display())]
    CreateDir { path: PathBuf, source: io::Error },

    #[error("could not write dashboard to {}: {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },
}

pub type ReporterResult<T> = Result<T, ReporterError>;
pub type DashboardResult<T> = Result<T, DashboardError>;
