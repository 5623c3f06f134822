// ABOUTME: Error types for the output sinks.
// ABOUTME: Provides SinkError with Io, Csv, Document, and Unavailable variants.

use std::fmt;
use std::path::Path;

use thiserror::Error;

/// Errors raised while opening or writing a sink.
#[derive(Debug, Error)]
pub enum SinkError {
    /// The tabular file could not be created or read.
    #[error("{path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// A row could not be encoded or decoded.
    #[error("csv: {0}")]
    Csv(#[from] csv::Error),

    /// The document store rejected a connection or an insert.
    #[error("document store: {0}")]
    Document(String),

    /// No requested sink could be opened.
    #[error("no sink available: {0}")]
    Unavailable(String),
}

impl SinkError {
    pub fn io(path: &Path, source: std::io::Error) -> Self {
        SinkError::Io {
            path: path.display().to_string(),
            source,
        }
    }

    /// Creates a Document error from a driver error.
    pub fn document(err: impl fmt::Display) -> Self {
        SinkError::Document(err.to_string())
    }
}
