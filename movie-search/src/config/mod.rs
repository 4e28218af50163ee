//! Configuration and dependency wiring for the movie search seeder.

mod dependencies;
mod settings;

pub use dependencies::Dependencies;
pub use settings::{AppConfig, BlobBackend};
