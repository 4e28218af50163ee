//! Seeder module for the movie search ingest.
//!
//! Coordinates one seed run: fetch the source blob, parse it, and replace the
//! table contents.

use std::sync::Arc;
use tracing::{info, instrument};

use crate::errors::IngestError;
use crate::loader::{LoaderConfig, ReplaceLoader};
use crate::parser::RecordParser;
use movie_search_repository::{BlobLocation, BlobStore, MovieStore};

/// Configuration for a seed run.
#[derive(Debug, Clone)]
pub struct SeedConfig {
    /// Location of the bulk source file.
    pub source: BlobLocation,
    pub loader: LoaderConfig,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            source: BlobLocation::new("movie-search-data", "movies.json"),
            loader: LoaderConfig::default(),
        }
    }
}

/// Outcome of a successful seed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    /// Valid source records upserted, duplicates included.
    pub count: usize,
    /// Source records dropped as malformed.
    pub skipped: usize,
    /// Source records that repeated an earlier id.
    pub duplicates: usize,
    /// Upsert statements executed.
    pub batches: usize,
    /// Rows that were in the table before the run.
    pub deleted: u64,
}

/// Seeder that runs the full ingest flow.
///
/// The seeder:
/// - Fetches the source before touching the table, so a missing source
///   leaves the table as it was
/// - Skips malformed records without failing the run
/// - Hands the valid records to the `ReplaceLoader`
pub struct Seeder {
    blobs: Arc<dyn BlobStore>,
    parser: RecordParser,
    loader: ReplaceLoader,
    source: BlobLocation,
}

impl Seeder {
    /// Create a new seeder with the given backends and configuration.
    pub fn new(blobs: Arc<dyn BlobStore>, store: Arc<dyn MovieStore>, config: SeedConfig) -> Self {
        Self {
            blobs,
            parser: RecordParser::new(),
            loader: ReplaceLoader::with_config(store, config.loader),
            source: config.source,
        }
    }

    pub fn source(&self) -> &BlobLocation {
        &self.source
    }

    /// Run the seed.
    ///
    /// # Returns
    ///
    /// * `Ok(SeedReport)` - Counts for the committed run
    /// * `Err(IngestError)` - If the source cannot be read or any write fails; the
    ///   table is unchanged in both cases
    #[instrument(skip(self), fields(source = %self.source))]
    pub async fn run(&self) -> Result<SeedReport, IngestError> {
        self.loader.config().validate()?;

        info!("Loading movie data from blob store");

        let text = self.blobs.get_text(&self.source).await?;
        let parsed = self.parser.parse_source(&text);

        info!(
            loaded = parsed.movies.len(),
            skipped = parsed.skipped,
            duplicates = parsed.duplicates,
            "Loaded movies from source"
        );

        let load = self.loader.replace_all(&parsed.movies).await?;

        // Every valid record counts, including ones collapsed into an earlier id.
        let count = load.written + parsed.duplicates;

        info!(count = count, unique = load.written, "Seed completed");

        Ok(SeedReport {
            count,
            skipped: parsed.skipped,
            duplicates: parsed.duplicates,
            batches: load.batches,
            deleted: load.deleted,
        })
    }
}
