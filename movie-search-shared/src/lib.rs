//! # Movie Search Shared
//!
//! Shared types used across the movie search crates: the `Movie` record that
//! flows from the ingest source into the table, the search query and result
//! types, and the JSON response envelope returned by every operation.

mod movie;
mod response;
mod search;

pub use movie::Movie;
pub use response::{ApiResponse, InitSummary, SeedSummary};
pub use search::{MovieSearchHit, MovieSearchPage, MovieSearchQuery};
