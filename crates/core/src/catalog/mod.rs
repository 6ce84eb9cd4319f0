//! Movie catalog integration.
//!
//! The catalog answers two kinds of requests: "popular movies" when the
//! query is empty and free-text search otherwise.

mod tmdb;
mod types;

pub use tmdb::TmdbCatalog;
pub use types::*;

use async_trait::async_trait;
use thiserror::Error;

/// Message used when the provider reports a failure without saying why.
pub const DEFAULT_PROVIDER_ERROR: &str = "Failed to fetch movies";

/// Errors that can occur when querying the movie catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The request could not be sent or the body could not be read.
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// The catalog answered with a non-success status.
    #[error("Failed to fetch movies: HTTP {status}")]
    FetchError { status: u16 },

    /// The payload parsed but flagged a logical failure.
    #[error("{message}")]
    ProviderError { message: String },

    /// Failed to parse response.
    #[error("Failed to parse response: {0}")]
    ParseError(String),

    /// Client not configured (missing token, etc.).
    #[error("Client not configured: {0}")]
    NotConfigured(String),
}

/// Coarse classification of a catalog failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Transport error, non-success status or unreadable payload.
    Network,
    /// The provider answered but reported the request as failed.
    Provider,
}

impl CatalogError {
    pub fn failure_kind(&self) -> FailureKind {
        match self {
            CatalogError::ProviderError { .. } => FailureKind::Provider,
            _ => FailureKind::Network,
        }
    }

    /// Label used for the request counter.
    pub(crate) fn metric_label(&self) -> &'static str {
        match self {
            CatalogError::HttpError(_) => "network_error",
            CatalogError::FetchError { .. } => "http_error",
            CatalogError::ProviderError { .. } => "provider_error",
            CatalogError::ParseError(_) => "parse_error",
            CatalogError::NotConfigured(_) => "not_configured",
        }
    }
}

/// A source of movie listings.
#[async_trait]
pub trait MovieCatalog: Send + Sync {
    /// Fetch movies for `query`.
    ///
    /// An empty query lists popular movies; anything else is a text search.
    async fn fetch_movies(&self, query: &str) -> Result<Vec<Movie>, CatalogError>;
}
