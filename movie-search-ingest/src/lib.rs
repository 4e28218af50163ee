//! # Movie Search Ingest
//!
//! This crate provides the ingest components that turn a bulk source file in
//! blob storage into the contents of the movie table.
//!
//! ## Architecture
//!
//! The ingest follows the Parser-Loader pattern:
//!
//! 1. **Parser**: Splits the source into records, skipping malformed lines
//! 2. **Loader**: Replaces the table contents in one transaction, in fixed-size batches
//! 3. **Seeder**: Fetches the source and coordinates the ingest flow

pub mod errors;
pub mod loader;
pub mod parser;
pub mod seeder;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

pub use errors::IngestError;
pub use loader::{LoadReport, LoaderConfig, ReplaceLoader};
pub use parser::{MalformedRecord, ParsedSource, RecordParser};
pub use seeder::{SeedConfig, SeedReport, Seeder};
