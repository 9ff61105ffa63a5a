//! Error taxonomy for an analysis run.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while analysing a project.
///
/// `RootUnreadable`, `LanguageInit`, `UnsupportedExtension` and `ThreadPool`
/// abort the run. The per-file variants are recovered by the graph builder
/// and surface as [`Diagnostic`]s.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("cannot read project root {path}: {reason}")]
    RootUnreadable { path: String, reason: String },

    #[error("failed to read {path}: {source}")]
    FileRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {message}")]
    Parse { path: String, message: String },

    #[error("tree-sitter language initialisation failed: {0}")]
    LanguageInit(String),

    #[error("no analyser registered for extension .{0}")]
    UnsupportedExtension(String),

    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl AnalysisError {
    /// The file a per-file error refers to, if any.
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::RootUnreadable { path, .. }
            | Self::FileRead { path, .. }
            | Self::Parse { path, .. } => Some(path),
            Self::LanguageInit(_) | Self::UnsupportedExtension(_) | Self::ThreadPool(_) => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, AnalysisError>;

/// A recovered per-file failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub path: String,
    pub message: String,
}

impl From<&AnalysisError> for Diagnostic {
    fn from(err: &AnalysisError) -> Self {
        Self {
            path: err.path().unwrap_or_default().to_string(),
            message: err.to_string(),
        }
    }
}
