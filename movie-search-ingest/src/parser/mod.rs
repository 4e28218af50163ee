//! Parser module for the movie search ingest.
//!
//! Transforms the raw source text into validated movie records.

mod record_parser;

pub use record_parser::{MalformedRecord, ParsedSource, RecordParser, MAX_ID_LEN};
