use std::path::PathBuf;

use thiserror::Error;

/// Convenience alias used across the crate.
pub type Result<T> = std::result::Result<T, HuvudbokError>;

/// Failures raised while reading, aggregating or rendering a huvudbok.
#[derive(Debug, Error)]
pub enum HuvudbokError {
    /// A source row could not be interpreted. Aborts the whole run.
    #[error("row {row}: {reason}: {content}")]
    RowParse {
        row: usize,
        content: String,
        reason: String,
    },
    #[error("configuration file not found: {}", .0.display())]
    ConfigurationMissing(PathBuf),
    #[error("invalid section layout: {0}")]
    SectionRange(String),
    #[error("invalid merge table: {0}")]
    InvalidMergeTable(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl HuvudbokError {
    pub(crate) fn row_parse(row: usize, content: &str, reason: impl Into<String>) -> Self {
        Self::RowParse {
            row,
            content: content.trim_end_matches(['\r', '\n']).to_string(),
            reason: reason.into(),
        }
    }

    /// Whether the CLI may continue after logging this error.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::ConfigurationMissing(_))
    }
}
