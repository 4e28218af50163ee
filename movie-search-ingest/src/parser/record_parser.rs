//! Record parser implementation.
//!
//! Turns the text of a bulk source into validated `Movie` records. Every line
//! (or array element) yields its own `Result`, so one bad record never fails
//! the whole source.

use std::collections::HashMap;

use serde_json::Value;
use tracing::{debug, instrument, warn};

use movie_search_shared::Movie;

/// Longest id the `id VARCHAR(20)` column accepts.
pub const MAX_ID_LEN: usize = 20;

/// Exclusive bound on `|rating|` for the `NUMERIC(3,1)` column. Anything at
/// or above it rounds to 100.0, which overflows the column.
const RATING_LIMIT: f64 = 99.95;

/// A record that was dropped from the ingest.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("record {position}: {reason}")]
pub struct MalformedRecord {
    /// 1-based line number, or array element number for array sources.
    pub position: usize,
    pub reason: String,
}

/// Result of parsing a whole source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedSource {
    /// Valid records, one per id, in order of first appearance.
    pub movies: Vec<Movie>,
    /// Records dropped as malformed.
    pub skipped: usize,
    /// Records that repeated an earlier id and replaced it.
    pub duplicates: usize,
}

/// Parser for newline-delimited JSON movie sources.
///
/// A source that parses as a whole as a JSON array is read element by
/// element instead. Anything else, including a first line that merely starts
/// with `[`, goes through the per-line path.
pub struct RecordParser {}

impl RecordParser {
    /// Create a new record parser.
    pub fn new() -> Self {
        Self {}
    }

    /// Parse a full source.
    ///
    /// Never fails: malformed records are counted in `skipped`.
    #[instrument(skip(self, text), fields(bytes = text.len()))]
    pub fn parse_source(&self, text: &str) -> ParsedSource {
        let text = text.trim_start_matches('\u{feff}');

        let results: Vec<Result<Movie, MalformedRecord>> = match Self::array_elements(text) {
            Some(elements) => elements
                .into_iter()
                .enumerate()
                .map(|(index, value)| self.parse_value(index + 1, value))
                .collect(),
            None => text
                .lines()
                .enumerate()
                .filter(|(_, line)| !line.trim().is_empty())
                .map(|(index, line)| self.parse_line(index + 1, line))
                .collect(),
        };

        let parsed = Self::collect(results);

        debug!(
            valid = parsed.movies.len(),
            skipped = parsed.skipped,
            duplicates = parsed.duplicates,
            "Parsed source"
        );
        parsed
    }

    fn array_elements(text: &str) -> Option<Vec<Value>> {
        if !text.trim_start().starts_with('[') {
            return None;
        }

        match serde_json::from_str::<Vec<Value>>(text) {
            Ok(elements) => Some(elements),
            Err(e) => {
                debug!(error = %e, "Source is not a JSON array, reading it line by line");
                None
            }
        }
    }

    /// Parse a single non-blank line.
    pub fn parse_line(&self, position: usize, line: &str) -> Result<Movie, MalformedRecord> {
        let movie: Movie = serde_json::from_str(line).map_err(|e| MalformedRecord {
            position,
            reason: e.to_string(),
        })?;

        Self::validate(position, movie)
    }

    fn parse_value(&self, position: usize, value: Value) -> Result<Movie, MalformedRecord> {
        let movie: Movie = serde_json::from_value(value).map_err(|e| MalformedRecord {
            position,
            reason: e.to_string(),
        })?;

        Self::validate(position, movie)
    }

    fn validate(position: usize, movie: Movie) -> Result<Movie, MalformedRecord> {
        let reject = |reason: String| MalformedRecord { position, reason };

        if movie.id.trim().is_empty() {
            return Err(reject("id is empty".to_string()));
        }
        if movie.id.chars().count() > MAX_ID_LEN {
            return Err(reject(format!("id is longer than {} characters", MAX_ID_LEN)));
        }
        if movie.title.trim().is_empty() {
            return Err(reject("title is empty".to_string()));
        }
        if let Some(field) = Self::field_with_nul(&movie) {
            return Err(reject(format!("{} contains a NUL character", field)));
        }
        if let Some(rating) = movie.rating {
            if !rating.is_finite() || rating.abs() >= RATING_LIMIT {
                return Err(reject(format!("rating out of range: {}", rating)));
            }
        }

        Ok(movie)
    }

    /// PostgreSQL text cannot hold `\0`.
    fn field_with_nul(movie: &Movie) -> Option<&'static str> {
        let has_nul = |value: &str| value.contains('\0');
        let list_has_nul = |values: &[String]| values.iter().any(|v| has_nul(v.as_str()));

        if has_nul(movie.id.as_str()) {
            Some("id")
        } else if has_nul(movie.title.as_str()) {
            Some("title")
        } else if movie.plot.as_deref().is_some_and(has_nul) {
            Some("plot")
        } else if movie.image_url.as_deref().is_some_and(has_nul) {
            Some("image_url")
        } else if list_has_nul(&movie.genres) {
            Some("genres")
        } else if list_has_nul(&movie.directors) {
            Some("directors")
        } else if list_has_nul(&movie.actors) {
            Some("actors")
        } else {
            None
        }
    }

    /// Drop malformed records and collapse repeated ids (last one wins,
    /// first position kept).
    fn collect(results: Vec<Result<Movie, MalformedRecord>>) -> ParsedSource {
        let mut parsed = ParsedSource::default();
        let mut positions: HashMap<String, usize> = HashMap::new();

        for result in results {
            match result {
                Ok(movie) => match positions.get(&movie.id) {
                    Some(&slot) => {
                        debug!(id = %movie.id, "Replacing earlier record with the same id");
                        parsed.movies[slot] = movie;
                        parsed.duplicates += 1;
                    }
                    None => {
                        positions.insert(movie.id.clone(), parsed.movies.len());
                        parsed.movies.push(movie);
                    }
                },
                Err(malformed) => {
                    warn!(
                        position = malformed.position,
                        reason = %malformed.reason,
                        "Skipping malformed record"
                    );
                    parsed.skipped += 1;
                }
            }
        }

        parsed
    }
}

impl Default for RecordParser {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(id: &str, title: &str) -> String {
        format!(r#"{{"id":"{}","title":"{}"}}"#, id, title)
    }

    #[test]
    fn test_parse_valid_lines() {
        let parser = RecordParser::new();
        let source = [line("tt1", "Alien"), line("tt2", "Aliens")].join("\n");

        let parsed = parser.parse_source(&source);

        assert_eq!(parsed.movies.len(), 2);
        assert_eq!(parsed.skipped, 0);
        assert_eq!(parsed.movies[1].title, "Aliens");
    }

    #[test]
    fn test_malformed_line_is_skipped() {
        let parser = RecordParser::new();
        let source = format!(
            "{}\n{{\"id\": \"tt2\", \"title\": \n{}\n",
            line("tt1", "Alien"),
            line("tt3", "Alien 3")
        );

        let parsed = parser.parse_source(&source);

        assert_eq!(parsed.movies.len(), 2);
        assert_eq!(parsed.skipped, 1);
    }

    #[test]
    fn test_blank_lines_are_ignored() {
        let parser = RecordParser::new();
        let source = format!("\n{}\r\n   \n{}\n\n", line("tt1", "Alien"), line("tt2", "Aliens"));

        let parsed = parser.parse_source(&source);

        assert_eq!(parsed.movies.len(), 2);
        assert_eq!(parsed.skipped, 0);
    }

    #[test]
    fn test_line_numbers_are_one_based() {
        let parser = RecordParser::new();

        let err = parser.parse_line(7, "not json").unwrap_err();

        assert_eq!(err.position, 7);
    }

    #[test]
    fn test_validation_rules() {
        let parser = RecordParser::new();

        assert!(parser.parse_line(1, r#"{"id":"","title":"x"}"#).is_err());
        assert!(parser.parse_line(1, r#"{"id":"tt1","title":"  "}"#).is_err());
        assert!(parser.parse_line(1, r#"{"title":"x"}"#).is_err());
        assert!(parser.parse_line(1, r#"{"id":"tt123456789012345678901","title":"x"}"#).is_err());
        assert!(parser.parse_line(1, r#"{"id":"tt1","title":"x","rating":100}"#).is_err());
        assert!(parser.parse_line(1, r#"{"id":"tt1","title":"x","year":"1999"}"#).is_err());
        assert!(parser.parse_line(1, r#"["tt1","x"]"#).is_err());
        assert!(parser.parse_line(1, r#"{"id":"tt1","title":"x","rating":9.9}"#).is_ok());
    }

    #[test]
    fn test_duplicate_ids_keep_last_value_at_first_position() {
        let parser = RecordParser::new();
        let source = [
            line("tt1", "Alien"),
            line("tt2", "Aliens"),
            line("tt1", "Alien (Director's Cut)"),
        ]
        .join("\n");

        let parsed = parser.parse_source(&source);

        assert_eq!(parsed.movies.len(), 2);
        assert_eq!(parsed.duplicates, 1);
        assert_eq!(parsed.movies[0].id, "tt1");
        assert_eq!(parsed.movies[0].title, "Alien (Director's Cut)");
    }

    #[test]
    fn test_array_source() {
        let parser = RecordParser::new();
        let source = r#"[
            {"id":"tt1","title":"Alien"},
            {"id":"tt2"},
            {"id":"tt3","title":"Alien 3"}
        ]"#;

        let parsed = parser.parse_source(source);

        assert_eq!(parsed.movies.len(), 2);
        assert_eq!(parsed.skipped, 1);
    }

    #[test]
    fn test_broken_array_source_is_read_per_line() {
        let parser = RecordParser::new();
        let source = format!("[broken line\n{}\n{}", line("tt1", "Alien"), line("tt2", "Aliens"));

        let parsed = parser.parse_source(&source);

        assert_eq!(parsed.movies.len(), 2);
        assert_eq!(parsed.skipped, 1);
    }

    #[test]
    fn test_unterminated_array_is_not_fatal() {
        let parser = RecordParser::new();

        let parsed = parser.parse_source(r#"[{"id":"tt1","title":"Alien"}"#);

        assert!(parsed.movies.is_empty());
        assert_eq!(parsed.skipped, 1);
    }

    #[test]
    fn test_rating_that_rounds_to_100_is_rejected() {
        let parser = RecordParser::new();

        assert!(parser.parse_line(1, r#"{"id":"tt1","title":"x","rating":99.97}"#).is_err());
        assert!(parser.parse_line(1, r#"{"id":"tt1","title":"x","rating":99.95}"#).is_err());
        assert!(parser.parse_line(1, r#"{"id":"tt1","title":"x","rating":-99.96}"#).is_err());
        assert!(parser.parse_line(1, r#"{"id":"tt1","title":"x","rating":99.94}"#).is_ok());
    }

    #[test]
    fn test_nul_characters_are_rejected() {
        let parser = RecordParser::new();

        for line in [
            r#"{"id":"tt\u00001","title":"x"}"#,
            r#"{"id":"tt1","title":"Ali\u0000en"}"#,
            r#"{"id":"tt1","title":"x","plot":"a\u0000b"}"#,
            r#"{"id":"tt1","title":"x","image_url":"http://x/\u0000"}"#,
            r#"{"id":"tt1","title":"x","genres":["Sci\u0000Fi"]}"#,
            r#"{"id":"tt1","title":"x","actors":["a","\u0000"]}"#,
        ] {
            let err = parser.parse_line(3, line).unwrap_err();
            assert!(err.reason.contains("NUL"), "unexpected reason: {}", err.reason);
        }
    }

    #[test]
    fn test_empty_source() {
        let parser = RecordParser::new();

        let parsed = parser.parse_source("");

        assert_eq!(parsed, ParsedSource::default());
    }
}
