//! Error types for the movie search repository.

mod blob_error;
mod store_error;

pub use blob_error::BlobError;
pub use store_error::StoreError;
