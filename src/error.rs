//! Error types for the analysis engine

use thiserror::Error;

/// Result alias used throughout the library
pub type Result<T> = std::result::Result<T, AnalyzerError>;

/// Errors surfaced by loading, analysis and export
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// An input record is missing a required field or has the wrong shape
    #[error("malformed record in {context}: {reason}")]
    MalformedRecord { context: String, reason: String },

    /// A handle was requested that is not a node of the graph
    #[error("handle '{0}' is not present in the graph")]
    UnknownSourceNode(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl AnalyzerError {
    pub(crate) fn malformed(context: impl Into<String>, reason: impl Into<String>) -> Self {
        AnalyzerError::MalformedRecord {
            context: context.into(),
            reason: reason.into(),
        }
    }
}
