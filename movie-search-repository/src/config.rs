//! Connection configuration for the store and blob backends.

use std::time::Duration;

use sqlx::postgres::PgConnectOptions;

/// Connection settings for the PostgreSQL (ParadeDB) movie store.
#[derive(Debug, Clone)]
pub struct PostgresConfig {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub user: String,
    pub password: String,
    /// Name of the movie table. Must be a plain identifier.
    pub table: String,
    pub max_connections: u32,
    pub acquire_timeout_ms: u64,
}

impl Default for PostgresConfig {
    fn default() -> Self {
        Self {
            host: "paradedb.localhost.localstack.cloud".to_string(),
            port: 5432,
            database: "postgres".to_string(),
            user: "postgres".to_string(),
            password: "postgres".to_string(),
            table: "movies".to_string(),
            max_connections: 5,
            acquire_timeout_ms: 5000,
        }
    }
}

impl PostgresConfig {
    /// Build sqlx connect options from the individual settings.
    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .database(&self.database)
            .username(&self.user)
            .password(&self.password)
    }

    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_millis(self.acquire_timeout_ms.max(1))
    }
}

/// Settings for the S3-compatible blob store.
#[derive(Debug, Clone)]
pub struct S3Config {
    /// Base URL; objects are addressed path-style as `{endpoint}/{bucket}/{key}`.
    pub endpoint: String,
}

impl Default for S3Config {
    fn default() -> Self {
        Self {
            endpoint: "http://s3.localhost.localstack.cloud:4566".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_postgres_defaults() {
        let config = PostgresConfig::default();
        assert_eq!(config.port, 5432);
        assert_eq!(config.table, "movies");
        assert_eq!(config.acquire_timeout(), Duration::from_millis(5000));
    }

    #[test]
    fn test_zero_timeout_is_raised() {
        let config = PostgresConfig {
            acquire_timeout_ms: 0,
            ..Default::default()
        };
        assert_eq!(config.acquire_timeout(), Duration::from_millis(1));
    }

    #[test]
    fn test_connect_options_carry_settings() {
        let config = PostgresConfig {
            host: "db.internal".to_string(),
            port: 6543,
            database: "films".to_string(),
            ..Default::default()
        };
        let options = config.connect_options();

        assert_eq!(options.get_host(), "db.internal");
        assert_eq!(options.get_port(), 6543);
        assert_eq!(options.get_database(), Some("films"));
    }
}
