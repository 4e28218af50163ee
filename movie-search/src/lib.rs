//! # Movie Search
//!
//! Main library for the movie search seeder.
//!
//! This crate provides configuration, dependency wiring and the operation
//! handlers behind the `movie-search` binary.

pub mod config;
pub mod handlers;
pub mod logging;

pub use config::{AppConfig, BlobBackend, Dependencies};

use thiserror::Error;

/// Errors that can occur during startup.
#[derive(Error, Debug)]
pub enum AppError {
    /// Configuration error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Store error.
    #[error("Store error: {0}")]
    StoreError(#[from] movie_search_repository::StoreError),

    /// Blob store error.
    #[error("Blob error: {0}")]
    BlobError(#[from] movie_search_repository::BlobError),
}

impl AppError {
    /// Create a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }
}
