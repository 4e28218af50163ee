//! Dependency initialization and wiring for the movie search seeder.

use std::sync::Arc;
use tracing::info;

use crate::config::{AppConfig, BlobBackend};
use crate::AppError;
use movie_search_ingest::Seeder;
use movie_search_repository::{
    BlobStore, FileBlobStore, MovieStore, PostgresMovieStore, S3BlobStore,
};

/// Container for all initialized dependencies.
pub struct Dependencies {
    /// The movie table.
    pub store: Arc<dyn MovieStore>,
    /// Source of the seed file.
    pub blobs: Arc<dyn BlobStore>,
    config: AppConfig,
}

impl Dependencies {
    /// Initialize all dependencies from the given configuration.
    ///
    /// # Returns
    ///
    /// * `Ok(Dependencies)` - Initialized dependencies
    /// * `Err(AppError)` - If the database is unreachable or the blob endpoint is invalid
    pub async fn new(config: AppConfig) -> Result<Self, AppError> {
        info!(
            host = %config.postgres.host,
            table = %config.postgres.table,
            backend = ?config.blob_backend,
            source = %config.seed.source,
            "Initializing dependencies"
        );

        let store = PostgresMovieStore::connect(&config.postgres).await?;

        // Verify the database is reachable
        if !store.health_check().await? {
            return Err(AppError::config("PostgreSQL health check failed"));
        }

        info!("PostgreSQL connection verified");

        let blobs: Arc<dyn BlobStore> = match config.blob_backend {
            BlobBackend::S3 => Arc::new(S3BlobStore::new(&config.s3)?),
            BlobBackend::File => Arc::new(FileBlobStore::new()),
        };

        Ok(Self::from_parts(Arc::new(store), blobs, config))
    }

    /// Assemble dependencies from already constructed backends.
    pub fn from_parts(
        store: Arc<dyn MovieStore>,
        blobs: Arc<dyn BlobStore>,
        config: AppConfig,
    ) -> Self {
        Self {
            store,
            blobs,
            config,
        }
    }

    /// Build a seeder for the configured source and batch size.
    pub fn seeder(&self) -> Seeder {
        Seeder::new(
            self.blobs.clone(),
            self.store.clone(),
            self.config.seed.clone(),
        )
    }
}
