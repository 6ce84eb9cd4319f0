//! Testing utilities and mock implementations.
//!
//! This module provides mock implementations of the external service traits,
//! so the view logic and the server can be tested without network access.
//!
//! # Example
//!
//! ```rust,ignore
//! use marquee_core::testing::{fixtures, MockCatalog, MockCounterStore};
//!
//! let catalog = Arc::new(MockCatalog::new());
//! let store = Arc::new(MockCounterStore::new());
//!
//! catalog.set_results("batman", vec![fixtures::movie(1, "Batman")]).await;
//! store.add_entry(fixtures::trending_entry("joker", 4)).await;
//!
//! let view = ViewController::new(catalog, store, ViewOptions::default());
//! ```

mod mock_catalog;
mod mock_counter_store;

pub use mock_catalog::MockCatalog;
pub use mock_counter_store::{MockCounterStore, RecordedSearch};

/// Test fixtures and helper functions.
pub mod fixtures {
    use crate::catalog::Movie;
    use crate::counter_store::{document_id_for, TrendingEntry};

    /// Create a test movie with only an ID and a title.
    pub fn movie(id: u64, title: &str) -> Movie {
        Movie {
            id,
            title: title.to_string(),
            poster_path: None,
            vote_average: None,
            original_language: None,
            release_date: None,
        }
    }

    /// Create a test movie with a poster and reasonable card fields.
    pub fn movie_with_poster(id: u64, title: &str, poster_path: &str) -> Movie {
        Movie {
            poster_path: Some(poster_path.to_string()),
            vote_average: Some(7.5),
            original_language: Some("en".to_string()),
            release_date: Some("2008-07-16".to_string()),
            ..movie(id, title)
        }
    }

    /// Create a trending entry for `term` with a poster.
    pub fn trending_entry(term: &str, count: u64) -> TrendingEntry {
        TrendingEntry {
            id: document_id_for(term),
            search_term: term.to_string(),
            count,
            poster_url: format!(
                "https://image.tmdb.org/t/p/w500/{}.jpg",
                term.replace(' ', "_")
            ),
            movie_id: Some(count * 100),
            created_at: None,
        }
    }
}
