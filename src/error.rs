//! Error types for parsing, rendering and assembling benchmark reports.
//!
//! Every variant carries enough context (platform, file, line) to fix the
//! source data. Nothing here is retried or defaulted.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// Why a single measurement record was rejected
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordDefect {
    #[error("expected {expected} fields, found {found}")]
    FieldCount { expected: usize, found: usize },

    #[error("'{value}' is not a min/avg/max triplet of non-negative integers")]
    BadTriplet { value: String },

    #[error("'{value}' is not a non-negative integer")]
    BadInteger { value: String },

    #[error("record has an empty label")]
    EmptyLabel,
}

/// Errors raised while turning measurement files into a document
#[derive(Debug, Error)]
pub enum ReportError {
    /// A data line could not be parsed against the table schema
    #[error("{}: line {line}: malformed record: {defect}", location(.platform, .file))]
    MalformedRecord { platform: String, file: Option<PathBuf>, line: usize, defect: RecordDefect },

    /// A row was built with a cell count that disagrees with the schema
    #[error("{platform}: row {row} has {found} cells but the schema declares {expected} columns")]
    SchemaMismatch { platform: String, row: usize, expected: usize, found: usize },

    /// The template references a platform (or fragment) nobody supplied
    #[error("template references '{platform}' but no platform data or fragment was supplied for it")]
    MissingPlatformData { platform: String },

    /// Platform data was supplied but the template never places its table
    #[error("platform '{platform}' has a table but the template has no {{{{{platform}}}}} insertion point")]
    OrphanPlatformData { platform: String },

    /// Two platforms (or a platform and a fragment) share the same name
    #[error("'{platform}' is supplied more than once")]
    DuplicatePlatform { platform: String },

    #[error("invalid table schema: {0}")]
    InvalidSchema(String),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("failed to access '{path}': {source}")]
    Io { path: PathBuf, source: std::io::Error },

    #[error("failed to serialize tables: {0}")]
    Json(#[from] serde_json::Error),

    /// `--check` found a document that differs from a fresh render
    #[error("'{path}' is out of date (first difference at line {line})")]
    StaleOutput { path: PathBuf, line: usize },
}

impl ReportError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ReportError::Io { path: path.into(), source }
    }

    /// Record which measurement file a parse error came from
    pub fn in_file(self, path: &Path) -> Self {
        match self {
            ReportError::MalformedRecord { platform, line, defect, .. } => {
                ReportError::MalformedRecord { platform, file: Some(path.to_path_buf()), line, defect }
            }
            other => other,
        }
    }
}

fn location(platform: &str, file: &Option<PathBuf>) -> String {
    match file {
        Some(path) => format!("{} ({})", platform, path.display()),
        None => platform.to_string(),
    }
}

pub type Result<T> = std::result::Result<T, ReportError>;
