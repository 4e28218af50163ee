//! PostgreSQL (ParadeDB) store implementation.
//!
//! This module provides the concrete implementation of `MovieStore` on top of
//! a sqlx connection pool. Full-text search relies on the ParadeDB `bm25`
//! index access method and the `pdb` functions.

use async_trait::async_trait;
use sqlx::postgres::{PgPoolOptions, PgRow};
use sqlx::{PgPool, Postgres, Row, Transaction};
use tracing::{debug, info, instrument};

use crate::config::PostgresConfig;
use crate::errors::StoreError;
use crate::interfaces::{MovieStore, MovieTransaction, SchemaStatus};
use crate::postgres::queries;
use movie_search_shared::{Movie, MovieSearchHit, MovieSearchPage, MovieSearchQuery};

/// Movie store backed by a PostgreSQL table.
///
/// # Example
///
/// ```ignore
/// let store = PostgresMovieStore::connect(&PostgresConfig::default()).await?;
/// store.ensure_schema().await?;
///
/// let mut tx = store.begin().await?;
/// tx.delete_all().await?;
/// tx.upsert_batch(&movies).await?;
/// tx.commit().await?;
/// ```
pub struct PostgresMovieStore {
    pool: PgPool,
    table: String,
    index: String,
}

impl PostgresMovieStore {
    /// Connect a pool using the given configuration.
    ///
    /// # Returns
    ///
    /// * `Ok(PostgresMovieStore)` - A new store instance
    /// * `Err(StoreError::InvalidConfig)` - If the table name is not a plain identifier
    /// * `Err(StoreError::ConnectionError)` - If the pool cannot connect
    pub async fn connect(config: &PostgresConfig) -> Result<Self, StoreError> {
        queries::validate_identifier(&config.table, "table")?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections.max(1))
            .acquire_timeout(config.acquire_timeout())
            .connect_with(config.connect_options())
            .await
            .map_err(|e| StoreError::connection(e.to_string()))?;

        info!(
            host = %config.host,
            port = config.port,
            database = %config.database,
            table = %config.table,
            "Connected to PostgreSQL"
        );

        Self::from_pool(pool, &config.table)
    }

    /// Wrap an existing pool.
    pub fn from_pool(pool: PgPool, table: &str) -> Result<Self, StoreError> {
        queries::validate_identifier(table, "table")?;

        Ok(Self {
            pool,
            table: table.to_string(),
            index: queries::search_index_name(table),
        })
    }

    async fn index_exists(&self) -> Result<bool, StoreError> {
        let row = sqlx::query(queries::index_exists_sql())
            .bind(&self.index)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::schema(format!("Failed to check index: {}", e)))?;

        Ok(row.is_some())
    }
}

#[async_trait]
impl MovieStore for PostgresMovieStore {
    #[instrument(skip(self), fields(table = %self.table))]
    async fn ensure_schema(&self) -> Result<SchemaStatus, StoreError> {
        sqlx::query(&queries::create_table_sql(&self.table))
            .execute(&self.pool)
            .await
            .map_err(|e| StoreError::schema(format!("Failed to create table: {}", e)))?;

        info!("Movies table created");

        let index_created = if self.index_exists().await? {
            info!(index = %self.index, "BM25 index already exists");
            false
        } else {
            info!(index = %self.index, "Creating BM25 search index");
            sqlx::query(&queries::create_search_index_sql(&self.table, &self.index))
                .execute(&self.pool)
                .await
                .map_err(|e| StoreError::schema(format!("Failed to create index: {}", e)))?;
            true
        };

        Ok(SchemaStatus {
            table: self.table.clone(),
            index: self.index.clone(),
            index_created,
        })
    }

    async fn begin(&self) -> Result<Box<dyn MovieTransaction>, StoreError> {
        let tx = self
            .pool
            .begin()
            .await
            .map_err(|e| StoreError::transaction(format!("Failed to begin: {}", e)))?;

        debug!(table = %self.table, "Transaction started");

        Ok(Box::new(PgMovieTransaction {
            tx,
            table: self.table.clone(),
        }))
    }

    #[instrument(skip(self, query), fields(query = %query.query, limit = query.limit, offset = query.offset))]
    async fn search(&self, query: &MovieSearchQuery) -> Result<MovieSearchPage, StoreError> {
        if query.is_blank() {
            return Err(StoreError::invalid_query("query text is required"));
        }

        let rows = sqlx::query(&queries::search_sql(&self.table))
            .bind(&query.query)
            .bind(i64::from(query.limit))
            .bind(i64::from(query.offset))
            .fetch_all(&self.pool)
            .await
            .map_err(|e| StoreError::query(format!("Search failed: {}", e)))?;

        let results = rows
            .into_iter()
            .map(map_search_row)
            .collect::<Result<Vec<_>, _>>()?;

        let total: i64 = sqlx::query(&queries::search_count_sql(&self.table))
            .bind(&query.query)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| StoreError::query(format!("Count failed: {}", e)))?
            .try_get("total")
            .map_err(|e| StoreError::decode(format!("total: {}", e)))?;

        debug!(returned = results.len(), total = total, "Search completed");

        Ok(MovieSearchPage {
            results,
            total,
            limit: query.limit,
            offset: query.offset,
        })
    }

    async fn get_movie(&self, id: &str) -> Result<Option<Movie>, StoreError> {
        let row = sqlx::query(&queries::select_movie_sql(&self.table))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| StoreError::query(format!("Movie lookup failed: {}", e)))?;

        row.map(map_movie_row).transpose()
    }

    async fn health_check(&self) -> Result<bool, StoreError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map(|_| true)
            .map_err(|e| StoreError::connection(e.to_string()))
    }
}

/// Write transaction over the movie table.
///
/// sqlx rolls the transaction back when it is dropped uncommitted.
pub struct PgMovieTransaction {
    tx: Transaction<'static, Postgres>,
    table: String,
}

#[async_trait]
impl MovieTransaction for PgMovieTransaction {
    async fn delete_all(&mut self) -> Result<u64, StoreError> {
        let result = sqlx::query(&queries::delete_all_sql(&self.table))
            .execute(&mut *self.tx)
            .await
            .map_err(|e| StoreError::write(format!("Delete failed: {}", e)))?;

        Ok(result.rows_affected())
    }

    async fn upsert_batch(&mut self, movies: &[Movie]) -> Result<u64, StoreError> {
        if movies.is_empty() {
            return Ok(0);
        }

        let mut builder = queries::build_upsert(&self.table, movies);
        let result = builder
            .build()
            .execute(&mut *self.tx)
            .await
            .map_err(|e| StoreError::write(format!("Batch upsert failed: {}", e)))?;

        Ok(result.rows_affected())
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        self.tx
            .commit()
            .await
            .map_err(|e| StoreError::transaction(format!("Commit failed: {}", e)))
    }

    async fn rollback(self: Box<Self>) -> Result<(), StoreError> {
        self.tx
            .rollback()
            .await
            .map_err(|e| StoreError::transaction(format!("Rollback failed: {}", e)))
    }
}

fn list_column(row: &PgRow, name: &str) -> Result<Vec<String>, StoreError> {
    row.try_get::<Option<Vec<String>>, _>(name)
        .map(Option::unwrap_or_default)
        .map_err(|e| StoreError::decode(format!("{}: {}", name, e)))
}

fn column<'r, T>(row: &'r PgRow, name: &str) -> Result<T, StoreError>
where
    T: sqlx::Decode<'r, Postgres> + sqlx::Type<Postgres>,
{
    row.try_get::<T, _>(name)
        .map_err(|e| StoreError::decode(format!("{}: {}", name, e)))
}

fn map_search_row(row: PgRow) -> Result<MovieSearchHit, StoreError> {
    Ok(MovieSearchHit {
        id: column(&row, "id")?,
        title: column(&row, "title")?,
        year: column(&row, "year")?,
        genres: list_column(&row, "genres")?,
        rating: column(&row, "rating")?,
        directors: list_column(&row, "directors")?,
        actors: list_column(&row, "actors")?,
        highlight: column(&row, "highlight")?,
        score: column::<Option<f32>>(&row, "score")?.unwrap_or(0.0),
    })
}

fn map_movie_row(row: PgRow) -> Result<Movie, StoreError> {
    Ok(Movie {
        id: column(&row, "id")?,
        title: column(&row, "title")?,
        year: column(&row, "year")?,
        genres: list_column(&row, "genres")?,
        rating: column(&row, "rating")?,
        directors: list_column(&row, "directors")?,
        actors: list_column(&row, "actors")?,
        plot: column(&row, "plot")?,
        image_url: column(&row, "image_url")?,
        release_date: column(&row, "release_date")?,
        rank: column(&row, "rank")?,
        running_time_secs: column(&row, "running_time_secs")?,
    })
}
