//! S3-compatible blob store.
//!
//! Objects are fetched with a plain path-style `GET {endpoint}/{bucket}/{key}`,
//! which is what LocalStack and other S3 emulators serve without request
//! signing.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use tracing::{debug, error, info, instrument};
use url::Url;

use crate::config::S3Config;
use crate::errors::BlobError;
use crate::interfaces::{BlobLocation, BlobStore};

pub struct S3BlobStore {
    client: Client,
    endpoint: Url,
}

impl S3BlobStore {
    /// Create a blob store for the given endpoint.
    ///
    /// # Returns
    ///
    /// * `Ok(S3BlobStore)` - A new store instance
    /// * `Err(BlobError::InvalidLocation)` - If the endpoint is not a valid base URL
    pub fn new(config: &S3Config) -> Result<Self, BlobError> {
        let endpoint = Url::parse(&config.endpoint)
            .map_err(|e| BlobError::invalid_location(format!("Invalid endpoint: {}", e)))?;

        if endpoint.cannot_be_a_base() {
            return Err(BlobError::invalid_location(format!(
                "Endpoint cannot be a base URL: {}",
                config.endpoint
            )));
        }

        let client = Client::builder()
            .build()
            .map_err(|e| BlobError::unavailable(e.to_string()))?;

        info!(endpoint = %endpoint, "Created S3 blob store");

        Ok(Self { client, endpoint })
    }

    /// Build the path-style URL of an object. Each key segment is percent-encoded.
    pub fn object_url(&self, location: &BlobLocation) -> Result<Url, BlobError> {
        location.validate()?;

        let mut url = self.endpoint.clone();
        url.path_segments_mut()
            .map_err(|_| BlobError::invalid_location("Endpoint cannot be a base URL"))?
            .pop_if_empty()
            .push(&location.bucket)
            .extend(location.key.split('/'));

        Ok(url)
    }
}

#[async_trait]
impl BlobStore for S3BlobStore {
    #[instrument(skip(self, location), fields(location = %location))]
    async fn get_text(&self, location: &BlobLocation) -> Result<String, BlobError> {
        let url = self.object_url(location)?;

        debug!(url = %url, "Fetching object");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| BlobError::unavailable(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(BlobError::not_found(&location.bucket, &location.key));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(status = %status, body = %body, "Object request failed");
            return Err(BlobError::unavailable(format!("Status {}", status)));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| BlobError::unavailable(e.to_string()))?;

        String::from_utf8(bytes.to_vec()).map_err(|e| BlobError::DecodeError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(endpoint: &str) -> S3BlobStore {
        S3BlobStore::new(&S3Config {
            endpoint: endpoint.to_string(),
        })
        .unwrap()
    }

    #[test]
    fn test_object_url_is_path_style() {
        let store = store("http://s3.localhost.localstack.cloud:4566");
        let url = store
            .object_url(&BlobLocation::new("movie-search-data", "movies.json"))
            .unwrap();

        assert_eq!(
            url.as_str(),
            "http://s3.localhost.localstack.cloud:4566/movie-search-data/movies.json"
        );
    }

    #[test]
    fn test_object_url_keeps_key_prefixes_and_encodes_segments() {
        let store = store("http://localhost:4566/");
        let url = store
            .object_url(&BlobLocation::new("data", "seed/2024 movies.json"))
            .unwrap();

        assert_eq!(url.as_str(), "http://localhost:4566/data/seed/2024%20movies.json");
    }

    #[test]
    fn test_invalid_endpoint_is_rejected() {
        let result = S3BlobStore::new(&S3Config {
            endpoint: "not a url".to_string(),
        });
        assert!(matches!(result, Err(BlobError::InvalidLocation(_))));
    }

    #[test]
    fn test_empty_key_is_rejected() {
        let store = store("http://localhost:4566");
        assert!(store.object_url(&BlobLocation::new("data", "")).is_err());
    }
}
