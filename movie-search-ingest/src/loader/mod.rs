//! Loader module for the movie search ingest.
//!
//! Replaces the contents of the movie table with a new record set.

use std::sync::Arc;
use tracing::{debug, error, info, instrument, warn};

use crate::errors::IngestError;
use movie_search_repository::{MovieStore, MovieTransaction, MAX_UPSERT_BATCH};
use movie_search_shared::Movie;

/// Configuration for the replace loader.
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Number of records written per upsert statement.
    pub batch_size: usize,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self { batch_size: 100 }
    }
}

impl LoaderConfig {
    pub fn with_batch_size(batch_size: usize) -> Self {
        Self { batch_size }
    }

    pub fn validate(&self) -> Result<(), IngestError> {
        if self.batch_size == 0 {
            return Err(IngestError::invalid_config("batch_size must be at least 1"));
        }
        if self.batch_size > MAX_UPSERT_BATCH {
            return Err(IngestError::invalid_config(format!(
                "batch_size must be at most {}",
                MAX_UPSERT_BATCH
            )));
        }
        Ok(())
    }
}

/// Outcome of a successful replace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoadReport {
    /// Rows removed by the delete-all step.
    pub deleted: u64,
    /// Records written.
    pub written: usize,
    /// Upsert statements executed.
    pub batches: usize,
}

/// Loader that replaces the whole movie table in one transaction.
///
/// The loader:
/// - Deletes every existing row
/// - Writes the new records in fixed-size batches, one statement per batch
/// - Commits only after the last batch succeeds, and rolls back otherwise
pub struct ReplaceLoader {
    store: Arc<dyn MovieStore>,
    config: LoaderConfig,
}

impl ReplaceLoader {
    /// Create a new loader with the default batch size.
    pub fn new(store: Arc<dyn MovieStore>) -> Self {
        Self {
            store,
            config: LoaderConfig::default(),
        }
    }

    /// Create a new loader with custom configuration.
    pub fn with_config(store: Arc<dyn MovieStore>, config: LoaderConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// Replace the table contents with `movies`.
    ///
    /// `movies` must not repeat an id. Either every record is committed and
    /// the previous rows are gone, or the table is left exactly as it was.
    #[instrument(skip(self, movies), fields(record_count = movies.len(), batch_size = self.config.batch_size))]
    pub async fn replace_all(&self, movies: &[Movie]) -> Result<LoadReport, IngestError> {
        self.config.validate()?;

        let mut tx = self.store.begin().await?;

        match Self::write_all(tx.as_mut(), movies, self.config.batch_size).await {
            Ok(report) => {
                tx.commit().await?;
                info!(
                    deleted = report.deleted,
                    written = report.written,
                    batches = report.batches,
                    "Replaced table contents"
                );
                Ok(report)
            }
            Err(e) => {
                error!(error = %e, "Replace failed, rolling back");
                if let Err(rollback_error) = tx.rollback().await {
                    warn!(error = %rollback_error, "Rollback failed");
                }
                Err(e)
            }
        }
    }

    async fn write_all(
        tx: &mut dyn MovieTransaction,
        movies: &[Movie],
        batch_size: usize,
    ) -> Result<LoadReport, IngestError> {
        let deleted = tx.delete_all().await?;
        debug!(deleted = deleted, "Deleted existing rows");

        let mut report = LoadReport {
            deleted,
            written: 0,
            batches: 0,
        };

        for (index, batch) in movies.chunks(batch_size).enumerate() {
            tx.upsert_batch(batch)
                .await
                .map_err(|source| IngestError::BatchFailed {
                    batch: index + 1,
                    source,
                })?;

            report.written += batch.len();
            report.batches += 1;
            debug!(batch = index + 1, size = batch.len(), "Batch written");
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::InMemoryMovieStore;

    fn movies(count: usize) -> Vec<Movie> {
        (0..count)
            .map(|i| Movie::new(format!("tt{:07}", i), format!("Movie {}", i)))
            .collect()
    }

    #[tokio::test]
    async fn test_batches_split_at_batch_size() {
        let store = InMemoryMovieStore::new();
        let loader = ReplaceLoader::new(Arc::new(store.clone()));
        let input = movies(250);

        let report = loader.replace_all(&input).await.unwrap();

        assert_eq!(report.written, 250);
        assert_eq!(report.batches, 3);
        assert_eq!(store.batch_sizes(), vec![100, 100, 50]);

        let ids: Vec<String> = store.rows().into_iter().map(|m| m.id).collect();
        let expected: Vec<String> = input.into_iter().map(|m| m.id).collect();
        assert_eq!(ids, expected);
    }

    #[tokio::test]
    async fn test_replace_removes_previous_rows() {
        let store = InMemoryMovieStore::with_rows(vec![Movie::new("tt9999999", "Old")]);
        let loader = ReplaceLoader::new(Arc::new(store.clone()));

        let report = loader.replace_all(&movies(2)).await.unwrap();

        assert_eq!(report.deleted, 1);
        assert_eq!(store.rows().len(), 2);
        assert!(store.rows().iter().all(|m| m.id != "tt9999999"));
        assert_eq!(store.commits(), 1);
    }

    #[tokio::test]
    async fn test_failed_batch_rolls_back_everything() {
        let previous = vec![Movie::new("tt9999998", "Kept"), Movie::new("tt9999999", "Kept too")];
        let store = InMemoryMovieStore::with_rows(previous.clone());
        store.fail_on_batch(2);
        let loader = ReplaceLoader::new(Arc::new(store.clone()));

        let result = loader.replace_all(&movies(250)).await;

        assert!(matches!(result, Err(IngestError::BatchFailed { batch: 2, .. })));
        assert_eq!(store.rows(), previous);
        assert_eq!(store.commits(), 0);
        assert_eq!(store.rollbacks(), 1);
        assert_eq!(store.batch_sizes(), vec![100, 100]);
    }

    #[tokio::test]
    async fn test_failed_commit_keeps_previous_rows() {
        let previous = vec![Movie::new("tt9999999", "Kept")];
        let store = InMemoryMovieStore::with_rows(previous.clone());
        store.fail_on_commit();
        let loader = ReplaceLoader::new(Arc::new(store.clone()));

        let result = loader.replace_all(&movies(3)).await;

        assert!(matches!(result, Err(IngestError::StoreError(_))));
        assert_eq!(store.rows(), previous);
    }

    #[tokio::test]
    async fn test_custom_batch_size() {
        let store = InMemoryMovieStore::new();
        let loader =
            ReplaceLoader::with_config(Arc::new(store.clone()), LoaderConfig::with_batch_size(7));

        let report = loader.replace_all(&movies(20)).await.unwrap();

        assert_eq!(report.batches, 3);
        assert_eq!(store.batch_sizes(), vec![7, 7, 6]);
    }

    #[tokio::test]
    async fn test_zero_batch_size_is_rejected_before_writing() {
        let store = InMemoryMovieStore::with_rows(vec![Movie::new("tt1", "Kept")]);
        let loader =
            ReplaceLoader::with_config(Arc::new(store.clone()), LoaderConfig::with_batch_size(0));

        let result = loader.replace_all(&movies(3)).await;

        assert!(matches!(result, Err(IngestError::InvalidConfig(_))));
        assert_eq!(store.rows().len(), 1);
        assert!(store.batch_sizes().is_empty());
    }

    #[tokio::test]
    async fn test_oversized_batch_is_rejected_before_writing() {
        let store = InMemoryMovieStore::with_rows(vec![Movie::new("tt1", "Kept")]);
        let loader = ReplaceLoader::with_config(
            Arc::new(store.clone()),
            LoaderConfig::with_batch_size(MAX_UPSERT_BATCH + 1),
        );

        let result = loader.replace_all(&movies(3)).await;

        assert!(matches!(result, Err(IngestError::InvalidConfig(_))));
        assert_eq!(store.rows().len(), 1);
        assert!(store.batch_sizes().is_empty());
        assert!(LoaderConfig::with_batch_size(MAX_UPSERT_BATCH).validate().is_ok());
    }

    #[tokio::test]
    async fn test_empty_input_clears_table() {
        let store = InMemoryMovieStore::with_rows(vec![Movie::new("tt1", "Old")]);
        let loader = ReplaceLoader::new(Arc::new(store.clone()));

        let report = loader.replace_all(&[]).await.unwrap();

        assert_eq!(report.written, 0);
        assert_eq!(report.batches, 0);
        assert!(store.rows().is_empty());
    }
}
