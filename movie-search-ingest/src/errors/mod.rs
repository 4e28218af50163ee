//! Error types for the movie search ingest.

use movie_search_repository::{BlobError, StoreError};
use thiserror::Error;

/// Errors that abort an ingest run.
///
/// Malformed records are not errors at this level; the parser skips them.
#[derive(Error, Debug)]
pub enum IngestError {
    /// The source blob could not be fetched.
    #[error("Source error: {0}")]
    SourceError(#[from] BlobError),

    /// A batch upsert was rejected. The transaction has been rolled back.
    #[error("Batch {batch} failed: {source}")]
    BatchFailed {
        batch: usize,
        #[source]
        source: StoreError,
    },

    /// Error from the store outside of a batch (begin, delete, commit).
    #[error("Store error: {0}")]
    StoreError(#[from] StoreError),

    /// The ingest configuration is invalid.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl IngestError {
    /// Create an invalid configuration error.
    pub fn invalid_config(msg: impl Into<String>) -> Self {
        Self::InvalidConfig(msg.into())
    }
}
