//! Blob store trait definition.

use std::fmt;

use async_trait::async_trait;

use crate::errors::BlobError;

/// Address of a single object: a bucket and a key inside it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlobLocation {
    pub bucket: String,
    pub key: String,
}

impl BlobLocation {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
        }
    }

    /// Reject locations with an empty bucket or key.
    pub fn validate(&self) -> Result<(), BlobError> {
        if self.bucket.trim().is_empty() {
            return Err(BlobError::invalid_location("bucket is required"));
        }
        if self.key.trim().is_empty() {
            return Err(BlobError::invalid_location("key is required"));
        }
        Ok(())
    }
}

impl fmt::Display for BlobLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.bucket, self.key)
    }
}

/// Read-only access to an object store.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync` to allow use across async tasks.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Fetch the full body of an object as text.
    ///
    /// # Returns
    ///
    /// * `Ok(String)` - The object body
    /// * `Err(BlobError::NotFound)` - If the bucket or key does not exist
    /// * `Err(BlobError)` - If the store is unreachable or the body is not text
    async fn get_text(&self, location: &BlobLocation) -> Result<String, BlobError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_location_display() {
        let location = BlobLocation::new("movie-search-data", "movies.json");
        assert_eq!(location.to_string(), "movie-search-data/movies.json");
    }

    #[test]
    fn test_location_validation() {
        assert!(BlobLocation::new("bucket", "key").validate().is_ok());
        assert!(matches!(
            BlobLocation::new("", "key").validate(),
            Err(BlobError::InvalidLocation(_))
        ));
        assert!(matches!(
            BlobLocation::new("bucket", " ").validate(),
            Err(BlobError::InvalidLocation(_))
        ));
    }
}
