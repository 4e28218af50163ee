//! Settings read from the process environment.

use std::env;
use std::str::FromStr;

use crate::AppError;
use movie_search_ingest::{LoaderConfig, SeedConfig};
use movie_search_repository::{BlobLocation, PostgresConfig, S3Config};

/// Default bucket holding the seed file.
const DEFAULT_DATA_BUCKET: &str = "movie-search-data";

/// Default key of the seed file.
const DEFAULT_DATA_KEY: &str = "movies.json";

/// Where the seed file is read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlobBackend {
    /// S3-compatible object store over HTTP.
    S3,
    /// Local filesystem; the bucket is a directory.
    File,
}

impl FromStr for BlobBackend {
    type Err = AppError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "s3" => Ok(Self::S3),
            "file" => Ok(Self::File),
            other => Err(AppError::config(format!(
                "BLOB_BACKEND must be 's3' or 'file', got '{}'",
                other
            ))),
        }
    }
}

/// Complete runtime configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub postgres: PostgresConfig,
    pub s3: S3Config,
    pub blob_backend: BlobBackend,
    pub seed: SeedConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `PARADEDB_HOST`, `PARADEDB_PORT`, `PARADEDB_DATABASE`, `PARADEDB_USER`,
    ///   `PARADEDB_PASSWORD`: database connection
    /// - `MOVIES_TABLE`: table name (default: movies)
    /// - `DB_MAX_CONNECTIONS`, `DB_ACQUIRE_TIMEOUT_MS`: pool settings
    /// - `DATA_BUCKET`, `DATA_KEY`: seed file location (default: movie-search-data/movies.json)
    /// - `S3_ENDPOINT`: S3 endpoint (default: LocalStack)
    /// - `BLOB_BACKEND`: `s3` or `file` (default: s3)
    /// - `SEED_BATCH_SIZE`: records per upsert statement (default: 100)
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let pg_defaults = PostgresConfig::default();
        let text = |name: &str, default: &str| lookup(name).unwrap_or_else(|| default.to_string());

        let postgres = PostgresConfig {
            host: text("PARADEDB_HOST", &pg_defaults.host),
            port: parse_var(&lookup, "PARADEDB_PORT", pg_defaults.port)?,
            database: text("PARADEDB_DATABASE", &pg_defaults.database),
            user: text("PARADEDB_USER", &pg_defaults.user),
            password: text("PARADEDB_PASSWORD", &pg_defaults.password),
            table: text("MOVIES_TABLE", &pg_defaults.table),
            max_connections: parse_var(&lookup, "DB_MAX_CONNECTIONS", pg_defaults.max_connections)?,
            acquire_timeout_ms: parse_var(
                &lookup,
                "DB_ACQUIRE_TIMEOUT_MS",
                pg_defaults.acquire_timeout_ms,
            )?,
        };

        let s3 = S3Config {
            endpoint: text("S3_ENDPOINT", &S3Config::default().endpoint),
        };

        let blob_backend = match lookup("BLOB_BACKEND") {
            Some(value) => value.parse()?,
            None => BlobBackend::S3,
        };

        let batch_size = parse_var(&lookup, "SEED_BATCH_SIZE", LoaderConfig::default().batch_size)?;
        let loader = LoaderConfig::with_batch_size(batch_size);
        loader
            .validate()
            .map_err(|e| AppError::config(format!("SEED_BATCH_SIZE: {}", e)))?;

        let seed = SeedConfig {
            source: BlobLocation::new(
                text("DATA_BUCKET", DEFAULT_DATA_BUCKET),
                text("DATA_KEY", DEFAULT_DATA_KEY),
            ),
            loader,
        };

        Ok(Self {
            postgres,
            s3,
            blob_backend,
            seed,
        })
    }
}

fn parse_var<F, T>(lookup: &F, name: &str, default: T) -> Result<T, AppError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|e| AppError::config(format!("{} is invalid ({}): {}", name, value, e))),
        None => Ok(default),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use movie_search_repository::MAX_UPSERT_BATCH;

    fn config_from(vars: &[(&str, &str)]) -> Result<AppConfig, AppError> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        AppConfig::from_lookup(|name| vars.get(name).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();

        assert_eq!(config.postgres.host, "paradedb.localhost.localstack.cloud");
        assert_eq!(config.postgres.port, 5432);
        assert_eq!(config.postgres.table, "movies");
        assert_eq!(config.s3.endpoint, "http://s3.localhost.localstack.cloud:4566");
        assert_eq!(config.blob_backend, BlobBackend::S3);
        assert_eq!(
            config.seed.source,
            BlobLocation::new("movie-search-data", "movies.json")
        );
        assert_eq!(config.seed.loader.batch_size, 100);
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("PARADEDB_HOST", "localhost"),
            ("PARADEDB_PORT", "6543"),
            ("DATA_BUCKET", "/srv/data"),
            ("DATA_KEY", "seed.jsonl"),
            ("BLOB_BACKEND", "File"),
            ("SEED_BATCH_SIZE", "250"),
        ])
        .unwrap();

        assert_eq!(config.postgres.host, "localhost");
        assert_eq!(config.postgres.port, 6543);
        assert_eq!(config.blob_backend, BlobBackend::File);
        assert_eq!(config.seed.source, BlobLocation::new("/srv/data", "seed.jsonl"));
        assert_eq!(config.seed.loader.batch_size, 250);
    }

    #[test]
    fn test_invalid_numbers_are_rejected() {
        assert!(matches!(
            config_from(&[("PARADEDB_PORT", "not-a-port")]),
            Err(AppError::ConfigError(_))
        ));
        assert!(matches!(
            config_from(&[("SEED_BATCH_SIZE", "-1")]),
            Err(AppError::ConfigError(_))
        ));
        assert!(matches!(
            config_from(&[("SEED_BATCH_SIZE", "0")]),
            Err(AppError::ConfigError(_))
        ));
    }

    #[test]
    fn test_batch_size_above_bind_limit_is_rejected() {
        let too_large = (MAX_UPSERT_BATCH + 1).to_string();
        let largest = MAX_UPSERT_BATCH.to_string();

        assert!(matches!(
            config_from(&[("SEED_BATCH_SIZE", too_large.as_str())]),
            Err(AppError::ConfigError(_))
        ));
        assert_eq!(
            config_from(&[("SEED_BATCH_SIZE", largest.as_str())])
                .unwrap()
                .seed
                .loader
                .batch_size,
            MAX_UPSERT_BATCH
        );
    }

    #[test]
    fn test_unknown_backend_is_rejected() {
        assert!(config_from(&[("BLOB_BACKEND", "gcs")]).is_err());
    }
}
