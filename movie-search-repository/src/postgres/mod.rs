//! PostgreSQL (ParadeDB) implementation of the movie store.

mod client;
pub mod queries;

pub use client::{PgMovieTransaction, PostgresMovieStore};
pub use queries::MAX_UPSERT_BATCH;
