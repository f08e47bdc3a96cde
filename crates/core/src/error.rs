//! Structured error taxonomy shared by every pipeline stage.
//!
//! Mirrors the kinds in the project's error design: pattern validation,
//! security, pattern-conflict, filesystem, performance, and a catch-all
//! "unexpected" variant that preserves the underlying cause for diagnostics.

use std::path::PathBuf;

/// Role a pattern played when it failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PatternRole {
    Include,
    Exclude,
}

/// The three pattern-conflict sub-kinds a discovery or filter pass can hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PatternConflictKind {
    AllExcluded,
    Contradictory,
    Ineffective,
}

/// The core error taxonomy. Every variant carries enough structured context
/// to be re-serialized for a CLI caller without losing information.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("invalid pattern {pattern:?}: {reason}")]
    InvalidPatternSyntax {
        pattern: String,
        reason: String,
        index: Option<usize>,
        role: Option<PatternRole>,
    },

    #[error("pattern {pattern:?} rejected: {rule}")]
    SecurityViolation { pattern: String, rule: String },

    #[error("pattern conflict ({kind:?}): {included_count} included, {excluded_count} excluded")]
    PatternConflict {
        kind: PatternConflictKind,
        include: Vec<String>,
        exclude: Vec<String>,
        included_count: usize,
        excluded_count: usize,
    },

    #[error("filesystem error during {operation} at {path}: {source}")]
    Filesystem {
        path: PathBuf,
        operation: String,
        #[source]
        source: std::io::Error,
    },

    #[error("performance guard tripped: {metric}")]
    Performance { patterns: Vec<String>, metric: String },

    #[error("no files found under {root}")]
    NoFilesFound { root: PathBuf },

    #[error("unsupported file extension: {path}")]
    UnsupportedExtension { path: String },

    #[error("unexpected error during {operation}: {cause}")]
    Unexpected { operation: String, cause: String },
}

impl CoreError {
    /// Maps a kind to the authoritative process exit code.
    pub fn exit_code(&self) -> i32 {
        match self {
            CoreError::InvalidPatternSyntax { .. } => 10,
            CoreError::SecurityViolation { .. } => 11,
            CoreError::PatternConflict { .. } => 12,
            CoreError::Filesystem { .. } => 13,
            CoreError::NoFilesFound { .. } => 13,
            CoreError::Performance { .. } => 14,
            CoreError::UnsupportedExtension { .. } => 13,
            CoreError::Unexpected { .. } => 99,
        }
    }
}

pub type Result<T> = std::result::Result<T, CoreError>;
