//! Blob store implementations for the ingest source.

mod file;
mod s3;

pub use file::FileBlobStore;
pub use s3::S3BlobStore;
