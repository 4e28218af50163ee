//! Search query and result types.

use serde::{Deserialize, Serialize};

/// Parameters for a full-text movie search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieSearchQuery {
    /// Free text matched (fuzzily) against title and plot.
    pub query: String,
    pub limit: u32,
    pub offset: u32,
}

impl MovieSearchQuery {
    /// Default page size.
    pub const DEFAULT_LIMIT: u32 = 10;
    /// Upper bound for the page size.
    pub const MAX_LIMIT: u32 = 100;

    /// Create a query for the first page with the default limit.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            limit: Self::DEFAULT_LIMIT,
            offset: 0,
        }
    }

    /// Set the page size, clamped to `1..=MAX_LIMIT`.
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit.clamp(1, Self::MAX_LIMIT);
        self
    }

    pub fn with_offset(mut self, offset: u32) -> Self {
        self.offset = offset;
        self
    }

    /// Whether the query text is empty after trimming.
    pub fn is_blank(&self) -> bool {
        self.query.trim().is_empty()
    }
}

/// One ranked search result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieSearchHit {
    pub id: String,
    pub title: String,
    pub year: Option<i32>,
    pub genres: Vec<String>,
    pub rating: Option<f64>,
    pub directors: Vec<String>,
    pub actors: Vec<String>,
    /// Plot snippet with matches wrapped in `<mark>` tags.
    pub highlight: Option<String>,
    pub score: f32,
}

/// A page of search results.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovieSearchPage {
    pub results: Vec<MovieSearchHit>,
    /// Total number of matches, independent of pagination.
    pub total: i64,
    pub limit: u32,
    pub offset: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_defaults() {
        let query = MovieSearchQuery::new("matrix");
        assert_eq!(query.limit, 10);
        assert_eq!(query.offset, 0);
        assert!(!query.is_blank());
    }

    #[test]
    fn test_limit_is_clamped() {
        assert_eq!(MovieSearchQuery::new("a").with_limit(0).limit, 1);
        assert_eq!(MovieSearchQuery::new("a").with_limit(500).limit, 100);
        assert_eq!(MovieSearchQuery::new("a").with_limit(25).limit, 25);
    }

    #[test]
    fn test_blank_query() {
        assert!(MovieSearchQuery::new("   ").is_blank());
    }
}
