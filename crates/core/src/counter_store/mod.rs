//! Search counter store.
//!
//! Every successful search bumps a per-term counter in a hosted document
//! collection; the most-counted terms make up the trending list.

mod appwrite;
mod types;

pub use appwrite::AppwriteCounterStore;
pub use types::*;

use async_trait::async_trait;
use thiserror::Error;

use crate::catalog::Movie;

/// Errors that can occur when talking to the counter store.
#[derive(Debug, Error)]
pub enum CounterStoreError {
    /// HTTP request failed.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// API returned an error.
    #[error("API error: {status} - {message}")]
    ApiError { status: u16, message: String },

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Client not configured (missing project, collection, etc.).
    #[error("Client not configured: {0}")]
    NotConfigured(String),
}

/// Per-term search counters.
#[async_trait]
pub trait CounterStore: Send + Sync {
    /// Count one search for `term`.
    ///
    /// The first search of a term creates its document with `top_result` as
    /// the representative movie; later searches only increment the count.
    async fn record_search(
        &self,
        term: &str,
        top_result: &Movie,
    ) -> Result<TrendingEntry, CounterStoreError>;

    /// Up to `limit` entries, highest count first.
    async fn list_trending(&self, limit: usize) -> Result<Vec<TrendingEntry>, CounterStoreError>;
}
