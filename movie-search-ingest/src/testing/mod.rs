//! In-memory implementations of the store and blob interfaces.
//!
//! Enabled for this crate's tests and, through the `testing` feature, for
//! tests in downstream crates.

mod memory_blob;
mod memory_store;

pub use memory_blob::InMemoryBlobStore;
pub use memory_store::InMemoryMovieStore;
