//! Filesystem blob store. The bucket is a directory and the key a relative
//! path inside it.

use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use crate::errors::BlobError;
use crate::interfaces::{BlobLocation, BlobStore};

#[derive(Debug, Clone, Default)]
pub struct FileBlobStore;

impl FileBlobStore {
    pub fn new() -> Self {
        Self
    }

    /// Resolve a location to a path, refusing keys that climb out of the bucket.
    pub fn object_path(location: &BlobLocation) -> Result<PathBuf, BlobError> {
        location.validate()?;

        let key = Path::new(&location.key);
        let escapes = key
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir));
        if escapes {
            return Err(BlobError::invalid_location(format!(
                "Key must be a relative path inside the bucket: {}",
                location.key
            )));
        }

        Ok(Path::new(&location.bucket).join(key))
    }
}

#[async_trait]
impl BlobStore for FileBlobStore {
    async fn get_text(&self, location: &BlobLocation) -> Result<String, BlobError> {
        let path = Self::object_path(location)?;

        debug!(path = %path.display(), "Reading object from disk");

        let bytes = tokio::fs::read(&path).await.map_err(|e| match e.kind() {
            ErrorKind::NotFound => BlobError::not_found(&location.bucket, &location.key),
            _ => BlobError::unavailable(format!("{}: {}", path.display(), e)),
        })?;

        String::from_utf8(bytes).map_err(|e| BlobError::DecodeError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{SystemTime, UNIX_EPOCH};

    fn scratch_dir() -> PathBuf {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let dir = std::env::temp_dir().join(format!("movie-blob-{}-{}", std::process::id(), nanos));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[tokio::test]
    async fn test_reads_object() {
        let dir = scratch_dir();
        std::fs::write(dir.join("movies.json"), "{\"id\":\"tt1\",\"title\":\"Alien\"}\n").unwrap();

        let location = BlobLocation::new(dir.to_string_lossy(), "movies.json");
        let body = FileBlobStore::new().get_text(&location).await.unwrap();

        assert!(body.contains("Alien"));
        std::fs::remove_dir_all(dir).unwrap();
    }

    #[tokio::test]
    async fn test_missing_object_is_not_found() {
        let dir = scratch_dir();
        let location = BlobLocation::new(dir.to_string_lossy(), "absent.json");

        let result = FileBlobStore::new().get_text(&location).await;

        assert!(matches!(result, Err(BlobError::NotFound { .. })));
        std::fs::remove_dir_all(dir).unwrap();
    }

    #[test]
    fn test_parent_traversal_is_rejected() {
        let location = BlobLocation::new("/data", "../etc/passwd");
        assert!(matches!(
            FileBlobStore::object_path(&location),
            Err(BlobError::InvalidLocation(_))
        ));
    }
}
