//! Error types for shipready
//!
//! Only two things can stop a run: an unusable project root and invalid
//! configuration. Everything that goes wrong with an individual file is a
//! recoverable [`AnalysisWarning`](crate::models::AnalysisWarning) instead.

use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors that abort a run before any score is computed
#[derive(Error, Debug)]
pub enum ReadinessError {
    #[error("Project root does not exist: {}", .0.display())]
    RootNotFound(PathBuf),

    #[error("Project root is not a directory: {}", .0.display())]
    RootNotDirectory(PathBuf),

    #[error("Project root is not readable: {}: {source}", path.display())]
    RootUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Failed to write run record {}: {source}", path.display())]
    Record {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Analyzer '{0}' produced no report")]
    MissingReport(&'static str),
}

/// Errors from the structural source parser.
///
/// These never escape the source analyzer; a unit that fails to parse is
/// counted with zero definitions and a warning.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("syntax error at line {line}, column {column}")]
    Syntax { line: usize, column: usize },

    #[error("failed to load Python grammar: {0}")]
    Grammar(String),

    #[error("parser produced no syntax tree")]
    NoTree,
}

pub type ReadinessResult<T> = Result<T, ReadinessError>;
