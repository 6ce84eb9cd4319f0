//! Mock movie catalog for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::catalog::{CatalogError, Movie, MovieCatalog};

/// Mock implementation of the MovieCatalog trait.
///
/// Provides controllable behavior for testing:
/// - Return configurable results per query
/// - Delay individual queries to reorder responses
/// - Track queries for assertions
/// - Simulate failures
///
/// # Example
///
/// ```rust,ignore
/// use marquee_core::testing::{MockCatalog, fixtures};
///
/// let catalog = MockCatalog::new();
/// catalog.set_results("batman", vec![fixtures::movie(1, "Batman")]).await;
///
/// let movies = catalog.fetch_movies("batman").await?;
/// assert_eq!(movies.len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct MockCatalog {
    /// Results by exact query.
    results: Arc<RwLock<HashMap<String, Vec<Movie>>>>,
    /// Artificial latency by exact query.
    delays: Arc<RwLock<HashMap<String, Duration>>>,
    /// Recorded queries, in call order.
    queries: Arc<RwLock<Vec<String>>>,
    /// If set, the next fetch will fail with this error.
    next_error: Arc<RwLock<Option<CatalogError>>>,
}

impl MockCatalog {
    /// Create a new mock catalog that returns no movies.
    pub fn new() -> Self {
        Self::default()
    }

    /// Results returned for `query`. Unknown queries return no movies.
    pub async fn set_results(&self, query: &str, movies: Vec<Movie>) {
        self.results
            .write()
            .await
            .insert(query.to_string(), movies);
    }

    /// Delay the response for `query`.
    pub async fn set_delay(&self, query: &str, delay: Duration) {
        self.delays.write().await.insert(query.to_string(), delay);
    }

    /// Configure the next fetch to fail with the given error.
    pub async fn set_next_error(&self, error: CatalogError) {
        *self.next_error.write().await = Some(error);
    }

    /// Clear any pending error.
    pub async fn clear_next_error(&self) {
        *self.next_error.write().await = None;
    }

    /// Get all recorded queries.
    pub async fn recorded_queries(&self) -> Vec<String> {
        self.queries.read().await.clone()
    }

    /// Get the number of fetches performed.
    pub async fn query_count(&self) -> usize {
        self.queries.read().await.len()
    }

    /// Number of fetches performed for exactly `query`.
    pub async fn count_for(&self, query: &str) -> usize {
        self.queries
            .read()
            .await
            .iter()
            .filter(|q| q.as_str() == query)
            .count()
    }
}

#[async_trait]
impl MovieCatalog for MockCatalog {
    async fn fetch_movies(&self, query: &str) -> Result<Vec<Movie>, CatalogError> {
        self.queries.write().await.push(query.to_string());

        let delay = self.delays.read().await.get(query).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(err) = self.next_error.write().await.take() {
            return Err(err);
        }

        Ok(self
            .results
            .read()
            .await
            .get(query)
            .cloned()
            .unwrap_or_default())
    }
}
