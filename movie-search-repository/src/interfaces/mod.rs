//! Interface definitions for the blob source and the movie store.
//!
//! The traits here allow dependency injection of the backends so that the
//! ingest pipeline can be exercised against in-memory implementations.

mod blob_store;
mod movie_store;

pub use blob_store::{BlobLocation, BlobStore};
pub use movie_store::{MovieStore, MovieTransaction, SchemaStatus};
