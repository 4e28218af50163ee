//! # Movie Search Repository
//!
//! This crate provides traits and implementations for the two external
//! systems the seeder talks to: the blob store holding the bulk source file
//! and the relational table the movies are loaded into. It includes
//! definitions for errors, interfaces, a PostgreSQL (ParadeDB) store and
//! S3/filesystem blob stores.

pub mod blob;
pub mod config;
pub mod errors;
pub mod interfaces;
pub mod postgres;

pub use blob::{FileBlobStore, S3BlobStore};
pub use config::{PostgresConfig, S3Config};
pub use errors::{BlobError, StoreError};
pub use interfaces::{BlobLocation, BlobStore, MovieStore, MovieTransaction, SchemaStatus};
pub use postgres::{PostgresMovieStore, MAX_UPSERT_BATCH};
