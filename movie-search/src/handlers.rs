//! Operation handlers.
//!
//! Each handler runs one operation and folds the outcome into an
//! `ApiResponse`. Failures are logged with their cause and reported with a
//! fixed message, so callers never see store or blob internals.

use tracing::{error, info, instrument};

use movie_search_ingest::Seeder;
use movie_search_repository::MovieStore;
use movie_search_shared::{
    ApiResponse, InitSummary, Movie, MovieSearchPage, MovieSearchQuery, SeedSummary,
};

/// Create the movie table and search index if needed.
#[instrument(skip(store))]
pub async fn init_handler(store: &dyn MovieStore) -> ApiResponse<InitSummary> {
    info!("Initializing database schema");

    match store.ensure_schema().await {
        Ok(status) => ApiResponse::ok(InitSummary {
            message: "Database initialized successfully".to_string(),
            table: status.table,
            index: status.index,
            index_created: status.index_created,
        }),
        Err(e) => {
            error!(error = %e, "Init error");
            ApiResponse::failure("Initialization failed")
        }
    }
}

/// Replace the movie table with the contents of the configured source.
#[instrument(skip(seeder), fields(source = %seeder.source()))]
pub async fn seed_handler(seeder: &Seeder) -> ApiResponse<SeedSummary> {
    match seeder.run().await {
        Ok(report) => {
            info!(
                count = report.count,
                skipped = report.skipped,
                duplicates = report.duplicates,
                "Inserted movies"
            );
            ApiResponse::ok(SeedSummary::new(report.count))
        }
        Err(e) => {
            error!(error = %e, "Seed error");
            ApiResponse::failure("Seeding failed")
        }
    }
}

/// Full-text search over title and plot.
#[instrument(skip(store, query))]
pub async fn search_handler(
    store: &dyn MovieStore,
    query: Option<&str>,
    limit: Option<u32>,
    offset: Option<u32>,
) -> ApiResponse<MovieSearchPage> {
    let text = match query {
        Some(q) if !q.trim().is_empty() => q,
        _ => return ApiResponse::failure("Query parameter 'q' is required"),
    };

    let query = MovieSearchQuery::new(text)
        .with_limit(limit.unwrap_or(MovieSearchQuery::DEFAULT_LIMIT))
        .with_offset(offset.unwrap_or(0));

    info!(query = %query.query, limit = query.limit, offset = query.offset, "Searching");

    match store.search(&query).await {
        Ok(page) => ApiResponse::ok(page),
        Err(e) => {
            error!(error = %e, "Search error");
            ApiResponse::failure("Search failed")
        }
    }
}

/// Fetch one movie by id.
#[instrument(skip(store))]
pub async fn movie_detail_handler(store: &dyn MovieStore, id: &str) -> ApiResponse<Movie> {
    if id.trim().is_empty() {
        return ApiResponse::failure("Movie ID is required");
    }

    info!("Fetching movie");

    match store.get_movie(id).await {
        Ok(Some(movie)) => ApiResponse::ok(movie),
        Ok(None) => ApiResponse::failure("Movie not found"),
        Err(e) => {
            error!(error = %e, "Movie detail error");
            ApiResponse::failure("Failed to fetch movie")
        }
    }
}
