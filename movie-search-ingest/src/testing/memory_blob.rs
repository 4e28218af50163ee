use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use movie_search_repository::{BlobError, BlobLocation, BlobStore};

/// Blob store holding objects in a map.
#[derive(Default)]
pub struct InMemoryBlobStore {
    objects: HashMap<(String, String), String>,
    unavailable: bool,
    fetch_count: AtomicUsize,
}

impl InMemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_object(
        mut self,
        bucket: impl Into<String>,
        key: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        self.objects.insert((bucket.into(), key.into()), body.into());
        self
    }

    /// Make every fetch fail as if the store were unreachable.
    pub fn unavailable(mut self) -> Self {
        self.unavailable = true;
        self
    }

    pub fn fetch_count(&self) -> usize {
        self.fetch_count.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BlobStore for InMemoryBlobStore {
    async fn get_text(&self, location: &BlobLocation) -> Result<String, BlobError> {
        self.fetch_count.fetch_add(1, Ordering::SeqCst);

        if self.unavailable {
            return Err(BlobError::unavailable("connection refused"));
        }

        self.objects
            .get(&(location.bucket.clone(), location.key.clone()))
            .cloned()
            .ok_or_else(|| BlobError::not_found(&location.bucket, &location.key))
    }
}
