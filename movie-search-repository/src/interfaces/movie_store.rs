//! Movie store trait definitions.
//!
//! `MovieStore` is the handle to the destination table. Writes go through a
//! `MovieTransaction` obtained from `MovieStore::begin`, so that a full
//! replace is either committed as a whole or not at all.

use async_trait::async_trait;

use crate::errors::StoreError;
use movie_search_shared::{Movie, MovieSearchPage, MovieSearchQuery};

/// Outcome of `MovieStore::ensure_schema`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaStatus {
    pub table: String,
    pub index: String,
    /// False when the search index already existed.
    pub index_created: bool,
}

/// An open write transaction against the movie table.
///
/// Dropping a transaction without calling `commit` discards every change
/// made through it.
#[async_trait]
pub trait MovieTransaction: Send {
    /// Delete every row in the table.
    ///
    /// # Returns
    ///
    /// * `Ok(u64)` - Number of rows deleted
    /// * `Err(StoreError::WriteError)` - If the delete is rejected
    async fn delete_all(&mut self) -> Result<u64, StoreError>;

    /// Insert or update a batch of movies with a single statement, keyed on `id`.
    ///
    /// Callers must not pass two movies with the same `id` in one batch.
    ///
    /// # Returns
    ///
    /// * `Ok(u64)` - Number of rows written
    /// * `Err(StoreError::WriteError)` - If the statement is rejected
    async fn upsert_batch(&mut self, movies: &[Movie]) -> Result<u64, StoreError>;

    /// Make all changes visible.
    async fn commit(self: Box<Self>) -> Result<(), StoreError>;

    /// Discard all changes.
    async fn rollback(self: Box<Self>) -> Result<(), StoreError>;
}

/// Abstract interface for the movie table.
///
/// # Thread Safety
///
/// All implementations must be `Send + Sync` to allow use across async tasks.
#[async_trait]
pub trait MovieStore: Send + Sync {
    /// Create the table and its search index if they do not exist.
    async fn ensure_schema(&self) -> Result<SchemaStatus, StoreError>;

    /// Open a write transaction.
    async fn begin(&self) -> Result<Box<dyn MovieTransaction>, StoreError>;

    /// Run a fuzzy full-text search over title and plot.
    ///
    /// # Returns
    ///
    /// * `Ok(MovieSearchPage)` - Results ordered by relevance, with the total match count
    /// * `Err(StoreError::InvalidQuery)` - If the query text is blank
    async fn search(&self, query: &MovieSearchQuery) -> Result<MovieSearchPage, StoreError>;

    /// Fetch a single movie by id.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(Movie))` - If the movie exists
    /// * `Ok(None)` - If no movie has that id
    async fn get_movie(&self, id: &str) -> Result<Option<Movie>, StoreError>;

    /// Check if the store is reachable.
    async fn health_check(&self) -> Result<bool, StoreError>;
}
