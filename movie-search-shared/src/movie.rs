//! The movie record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// One movie, as stored in the destination table and read from one line of
/// the ingest source.
///
/// Only `id` and `title` are required. List fields default to empty when they
/// are missing or `null` in the source.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    /// Primary key (an IMDb-style identifier such as `tt0111161`).
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub year: Option<i32>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub genres: Vec<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub directors: Vec<String>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub actors: Vec<String>,
    #[serde(default)]
    pub plot: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub release_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub rank: Option<i32>,
    #[serde(default)]
    pub running_time_secs: Option<i32>,
}

impl Movie {
    /// Create a movie with only the required fields set.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            year: None,
            genres: Vec::new(),
            rating: None,
            directors: Vec::new(),
            actors: Vec::new(),
            plot: None,
            image_url: None,
            release_date: None,
            rank: None,
            running_time_secs: None,
        }
    }

    pub fn with_year(mut self, year: i32) -> Self {
        self.year = Some(year);
        self
    }

    pub fn with_rating(mut self, rating: f64) -> Self {
        self.rating = Some(rating);
        self
    }

    pub fn with_genres<I, S>(mut self, genres: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.genres = genres.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_plot(mut self, plot: impl Into<String>) -> Self {
        self.plot = Some(plot.into());
        self
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<Vec<String>>::deserialize(deserializer).map(Option::unwrap_or_default)
}
