//! SQL text and statement builders for the movie table.
//!
//! Table and index names are interpolated into SQL, so they are validated
//! with `validate_identifier` before a store is constructed. Values are always
//! bound as parameters.

use sqlx::{Postgres, QueryBuilder};

use crate::errors::StoreError;
use movie_search_shared::Movie;

/// Columns written by the upsert, in bind order.
const UPSERT_COLUMNS: &str = "id, title, year, genres, rating, directors, actors, plot, \
     image_url, release_date, rank, running_time_secs";

/// Parameters bound per upserted row, one per column in `UPSERT_COLUMNS`.
pub const UPSERT_BINDS_PER_ROW: usize = 12;

/// Most rows one upsert statement can carry within PostgreSQL's limit of
/// 65535 bind parameters per statement.
pub const MAX_UPSERT_BATCH: usize = u16::MAX as usize / UPSERT_BINDS_PER_ROW;

/// Columns selected when reading a full movie back.
const MOVIE_COLUMNS: &str = "id, title, year, genres, rating::float8 AS rating, directors, \
     actors, plot, image_url, release_date, rank, running_time_secs";

/// Check that a table or index name only contains ASCII alphanumerics and `_`.
pub fn validate_identifier(value: &str, field_name: &str) -> Result<(), StoreError> {
    if value.trim().is_empty() {
        return Err(StoreError::invalid_config(format!(
            "{} cannot be empty",
            field_name
        )));
    }

    let valid = value
        .chars()
        .all(|ch| ch.is_ascii_alphanumeric() || ch == '_');
    let starts_with_digit = value.chars().next().is_some_and(|ch| ch.is_ascii_digit());

    if !valid || starts_with_digit {
        return Err(StoreError::invalid_config(format!(
            "{} must be a plain identifier: {}",
            field_name, value
        )));
    }

    Ok(())
}

/// Name of the BM25 index for a table (`movies` -> `movies_search_idx`).
pub fn search_index_name(table: &str) -> String {
    format!("{}_search_idx", table)
}

pub fn create_table_sql(table: &str) -> String {
    format!(
        "CREATE TABLE IF NOT EXISTS {} (\
         id VARCHAR(20) PRIMARY KEY, \
         title TEXT NOT NULL, \
         year INTEGER, \
         genres TEXT[], \
         rating NUMERIC(3,1), \
         directors TEXT[], \
         actors TEXT[], \
         plot TEXT, \
         image_url TEXT, \
         release_date TIMESTAMPTZ, \
         rank INTEGER, \
         running_time_secs INTEGER)",
        table
    )
}

pub fn index_exists_sql() -> &'static str {
    "SELECT 1 FROM pg_indexes WHERE indexname = $1"
}

pub fn create_search_index_sql(table: &str, index: &str) -> String {
    format!(
        "CREATE INDEX {} ON {} USING bm25 (id, title, plot) WITH (key_field = 'id')",
        index, table
    )
}

pub fn delete_all_sql(table: &str) -> String {
    format!("DELETE FROM {}", table)
}

/// Build one multi-row `INSERT ... ON CONFLICT (id) DO UPDATE` for a batch.
///
/// `movies` must be non-empty and must not repeat an `id`.
pub fn build_upsert<'args>(table: &str, movies: &[Movie]) -> QueryBuilder<'args, Postgres> {
    let mut builder = QueryBuilder::new(format!("INSERT INTO {} ({}) ", table, UPSERT_COLUMNS));

    builder.push_values(movies, |mut row, movie| {
        row.push_bind(movie.id.clone())
            .push_bind(movie.title.clone())
            .push_bind(movie.year)
            .push_bind(movie.genres.clone())
            .push_bind(movie.rating)
            .push_unseparated("::numeric")
            .push_bind(movie.directors.clone())
            .push_bind(movie.actors.clone())
            .push_bind(movie.plot.clone())
            .push_bind(movie.image_url.clone())
            .push_bind(movie.release_date)
            .push_bind(movie.rank)
            .push_bind(movie.running_time_secs);
    });

    builder.push(
        " ON CONFLICT (id) DO UPDATE SET \
         title = EXCLUDED.title, \
         year = EXCLUDED.year, \
         genres = EXCLUDED.genres, \
         rating = EXCLUDED.rating, \
         directors = EXCLUDED.directors, \
         actors = EXCLUDED.actors, \
         plot = EXCLUDED.plot, \
         image_url = EXCLUDED.image_url, \
         release_date = EXCLUDED.release_date, \
         rank = EXCLUDED.rank, \
         running_time_secs = EXCLUDED.running_time_secs",
    );

    builder
}

/// Ranked fuzzy search over title and plot. Binds: query, limit, offset.
pub fn search_sql(table: &str) -> String {
    format!(
        "SELECT id, title, year, genres, rating::float8 AS rating, directors, actors, \
         pdb.snippet(plot, start_tag => '<mark>', end_tag => '</mark>') AS highlight, \
         pdb.score(id)::float4 AS score \
         FROM {} \
         WHERE title ||| $1::pdb.fuzzy(1) OR plot ||| $1::pdb.fuzzy(1) \
         ORDER BY score DESC \
         LIMIT $2 OFFSET $3",
        table
    )
}

/// Total number of matches for a search. Binds: query.
pub fn search_count_sql(table: &str) -> String {
    format!(
        "SELECT COUNT(*) AS total FROM {} \
         WHERE title ||| $1::pdb.fuzzy(1) OR plot ||| $1::pdb.fuzzy(1)",
        table
    )
}

pub fn select_movie_sql(table: &str) -> String {
    format!("SELECT {} FROM {} WHERE id = $1", MOVIE_COLUMNS, table)
}
