//! Error types for input ingestion.

use thiserror::Error;

/// Failure while reading the input stream.
///
/// Either variant ends consumption of the stream; entries emitted before the
/// failure are kept.
#[derive(Debug, Error)]
pub enum IngestError {
    /// A single line exceeded the configured buffer.
    #[error("input line exceeds {limit} bytes")]
    LineTooLong { limit: usize },

    /// The underlying reader failed.
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),
}
