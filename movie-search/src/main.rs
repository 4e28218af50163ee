use std::process::ExitCode;

use clap::{Parser, Subcommand};
use serde::Serialize;
use tracing::error;

use movie_search::handlers::{init_handler, movie_detail_handler, search_handler, seed_handler};
use movie_search::logging::{init_tracing, LogFormat};
use movie_search::{AppConfig, Dependencies};
use movie_search_repository::BlobLocation;
use movie_search_shared::ApiResponse;

#[derive(Parser)]
#[command(name = "movie-search")]
#[command(about = "Seed and query the ParadeDB movie search table", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log output format (defaults to LOG_FORMAT, then text)
    #[arg(long, value_enum, global = true)]
    log_format: Option<LogFormat>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the movies table and BM25 search index
    Init,
    /// Replace the movies table with the contents of the seed file
    Seed {
        /// Bucket (or directory, for the file backend) holding the seed file
        #[arg(long)]
        bucket: Option<String>,
        /// Key of the seed file
        #[arg(long)]
        key: Option<String>,
        /// Records per upsert statement
        #[arg(long)]
        batch_size: Option<usize>,
    },
    /// Fuzzy full-text search over title and plot
    Search {
        query: String,
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long)]
        offset: Option<u32>,
    },
    /// Show one movie
    Movie { id: String },
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.log_format.unwrap_or_else(LogFormat::from_env));

    let mut config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!(error = %e, "Failed to load configuration");
            return emit(&ApiResponse::<()>::failure(e.to_string()));
        }
    };

    if let Commands::Seed {
        bucket,
        key,
        batch_size,
    } = &cli.command
    {
        let source = &config.seed.source;
        config.seed.source = BlobLocation::new(
            bucket.clone().unwrap_or_else(|| source.bucket.clone()),
            key.clone().unwrap_or_else(|| source.key.clone()),
        );
        if let Some(batch_size) = batch_size {
            config.seed.loader.batch_size = *batch_size;
        }
        if let Err(e) = config.seed.loader.validate() {
            error!(error = %e, "Invalid --batch-size");
            return emit(&ApiResponse::<()>::failure(e.to_string()));
        }
    }

    let deps = match Dependencies::new(config).await {
        Ok(deps) => deps,
        Err(e) => {
            error!(error = %e, "Failed to initialize dependencies");
            return emit(&ApiResponse::<()>::failure(e.to_string()));
        }
    };

    match cli.command {
        Commands::Init => emit(&init_handler(deps.store.as_ref()).await),
        Commands::Seed { .. } => emit(&seed_handler(&deps.seeder()).await),
        Commands::Search {
            query,
            limit,
            offset,
        } => emit(&search_handler(deps.store.as_ref(), Some(query.as_str()), limit, offset).await),
        Commands::Movie { id } => emit(&movie_detail_handler(deps.store.as_ref(), &id).await),
    }
}

/// Print the response as JSON and map it to an exit code.
fn emit<T: Serialize>(response: &ApiResponse<T>) -> ExitCode {
    match serde_json::to_string_pretty(response) {
        Ok(body) => println!("{}", body),
        Err(e) => {
            error!(error = %e, "Failed to serialize response");
            return ExitCode::FAILURE;
        }
    }

    if response.success {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_seed_overrides() {
        let cli = Cli::parse_from([
            "movie-search",
            "seed",
            "--bucket",
            "fixtures",
            "--batch-size",
            "25",
        ]);

        match cli.command {
            Commands::Seed {
                bucket,
                key,
                batch_size,
            } => {
                assert_eq!(bucket.as_deref(), Some("fixtures"));
                assert!(key.is_none());
                assert_eq!(batch_size, Some(25));
            }
            _ => panic!("expected seed command"),
        }
    }

    #[test]
    fn test_parse_search() {
        let cli = Cli::parse_from(["movie-search", "search", "star wars", "--limit", "5"]);

        assert!(matches!(
            cli.command,
            Commands::Search { ref query, limit: Some(5), offset: None } if query == "star wars"
        ));
    }
}
