//! TMDB (The Movie Database) API client.
//!
//! Authenticates with a v4 read access token sent as a bearer token.

use std::time::Instant;

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use super::types::{CatalogEndpoint, Movie};
use super::{CatalogError, MovieCatalog, DEFAULT_PROVIDER_ERROR};
use crate::config::CatalogConfig;
use crate::metrics::{CATALOG_REQUESTS, CATALOG_REQUEST_DURATION};

/// TMDB API client.
pub struct TmdbCatalog {
    client: Client,
    base_url: String,
    api_token: String,
}

impl TmdbCatalog {
    /// Create a new TMDB client.
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        if config.api_token.is_empty() {
            return Err(CatalogError::NotConfigured(
                "TMDB API token is required".to_string(),
            ));
        }

        let client = Client::builder().timeout(config.timeout()).build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_token: config.api_token.clone(),
        })
    }

    /// URL requested for `query`.
    pub fn endpoint_url(&self, query: &str) -> String {
        match CatalogEndpoint::for_query(query) {
            CatalogEndpoint::Discover => {
                format!("{}/discover/movie?sort_by=popularity.desc", self.base_url)
            }
            CatalogEndpoint::Search => format!(
                "{}/search/movie?query={}",
                self.base_url,
                urlencoding::encode(query)
            ),
        }
    }

    async fn request(&self, url: &str) -> Result<Vec<Movie>, CatalogError> {
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.api_token)
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::FetchError {
                status: status.as_u16(),
            });
        }

        let payload: TmdbPayload = response.json().await.map_err(|e| {
            CatalogError::ParseError(format!("Failed to parse movie response: {}", e))
        })?;

        payload.into_movies()
    }
}

#[async_trait]
impl MovieCatalog for TmdbCatalog {
    async fn fetch_movies(&self, query: &str) -> Result<Vec<Movie>, CatalogError> {
        let endpoint = CatalogEndpoint::for_query(query);
        let url = self.endpoint_url(query);

        debug!("TMDB {} request: query='{}'", endpoint.as_str(), query);

        let start = Instant::now();
        let result = self.request(&url).await;

        CATALOG_REQUEST_DURATION
            .with_label_values(&[endpoint.as_str()])
            .observe(start.elapsed().as_secs_f64());
        let label = match &result {
            Ok(_) => "ok",
            Err(e) => e.metric_label(),
        };
        CATALOG_REQUESTS
            .with_label_values(&[endpoint.as_str(), label])
            .inc();

        result
    }
}

// ============================================================================
// TMDB API Response Types (private)
// ============================================================================

/// Either a page of results or a provider-level failure flag.
#[derive(Debug, Deserialize)]
struct TmdbPayload {
    #[serde(rename = "Response", default)]
    response: Option<String>,
    #[serde(rename = "Error", default)]
    error: Option<String>,
    #[serde(default)]
    results: Option<Vec<Movie>>,
}

impl TmdbPayload {
    fn into_movies(self) -> Result<Vec<Movie>, CatalogError> {
        if self.response.as_deref() == Some("False") {
            let message = self
                .error
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| DEFAULT_PROVIDER_ERROR.to_string());
            return Err(CatalogError::ProviderError { message });
        }

        Ok(self.results.unwrap_or_default())
    }
}
