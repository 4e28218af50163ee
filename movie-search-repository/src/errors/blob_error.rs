//! Blob error types.

use thiserror::Error;

/// Errors that can occur while fetching the ingest source.
///
/// All variants are fatal to a seed run and are raised before the
/// destination table is touched.
#[derive(Debug, Clone, Error)]
pub enum BlobError {
    /// The bucket or key does not exist.
    #[error("Object not found: {bucket}/{key}")]
    NotFound { bucket: String, key: String },

    /// The blob store could not be reached or returned an error status.
    #[error("Blob store unavailable: {0}")]
    Unavailable(String),

    /// The bucket/key pair cannot be turned into an address.
    #[error("Invalid location: {0}")]
    InvalidLocation(String),

    /// The object body is not valid UTF-8 text.
    #[error("Decode error: {0}")]
    DecodeError(String),
}

impl BlobError {
    /// Create a not found error.
    pub fn not_found(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self::NotFound {
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    /// Create an unavailable error.
    pub fn unavailable(msg: impl Into<String>) -> Self {
        Self::Unavailable(msg.into())
    }

    /// Create an invalid location error.
    pub fn invalid_location(msg: impl Into<String>) -> Self {
        Self::InvalidLocation(msg.into())
    }
}
