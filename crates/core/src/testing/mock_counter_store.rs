//! Mock counter store for testing.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::catalog::Movie;
use crate::counter_store::{
    document_id_for, rank_trending, CounterStore, CounterStoreError, TrendingEntry,
};

/// Image prefix used for posters of newly counted terms.
const MOCK_POSTER_BASE: &str = "https://image.tmdb.org/t/p/w500";

/// A recorded `record_search` call.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedSearch {
    pub term: String,
    pub movie: Movie,
}

/// In-memory implementation of the CounterStore trait.
///
/// Counts searches like the real store and records every call, including
/// calls that were configured to fail.
#[derive(Debug, Default)]
pub struct MockCounterStore {
    entries: Arc<RwLock<Vec<TrendingEntry>>>,
    recorded: Arc<RwLock<Vec<RecordedSearch>>>,
    list_calls: Arc<RwLock<usize>>,
    next_record_error: Arc<RwLock<Option<CounterStoreError>>>,
    next_list_error: Arc<RwLock<Option<CounterStoreError>>>,
}

impl MockCounterStore {
    /// Create a new empty mock store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a counter document.
    pub async fn add_entry(&self, entry: TrendingEntry) {
        self.entries.write().await.push(entry);
    }

    /// All counter documents, in insertion order.
    pub async fn entries(&self) -> Vec<TrendingEntry> {
        self.entries.read().await.clone()
    }

    /// Count stored for `term`, if any.
    pub async fn count_for(&self, term: &str) -> Option<u64> {
        self.entries
            .read()
            .await
            .iter()
            .find(|e| e.search_term == term)
            .map(|e| e.count)
    }

    /// Configure the next `record_search` to fail.
    pub async fn set_next_record_error(&self, error: CounterStoreError) {
        *self.next_record_error.write().await = Some(error);
    }

    /// Configure the next `list_trending` to fail.
    pub async fn set_next_list_error(&self, error: CounterStoreError) {
        *self.next_list_error.write().await = Some(error);
    }

    /// Every `record_search` call so far.
    pub async fn recorded_searches(&self) -> Vec<RecordedSearch> {
        self.recorded.read().await.clone()
    }

    pub async fn recorded_count(&self) -> usize {
        self.recorded.read().await.len()
    }

    /// Number of `list_trending` calls so far.
    pub async fn list_calls(&self) -> usize {
        *self.list_calls.read().await
    }

    /// Wait until at least `count` searches were recorded.
    ///
    /// Returns false if `timeout` passes first. Recording happens on detached
    /// tasks, so tests poll instead of asserting right after the fetch.
    pub async fn wait_for_recorded(&self, count: usize, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            if self.recorded_count().await >= count {
                return true;
            }
            if Instant::now() >= deadline {
                return false;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }
}

#[async_trait]
impl CounterStore for MockCounterStore {
    async fn record_search(
        &self,
        term: &str,
        top_result: &Movie,
    ) -> Result<TrendingEntry, CounterStoreError> {
        self.recorded.write().await.push(RecordedSearch {
            term: term.to_string(),
            movie: top_result.clone(),
        });

        if let Some(err) = self.next_record_error.write().await.take() {
            return Err(err);
        }

        let mut entries = self.entries.write().await;
        if let Some(entry) = entries.iter_mut().find(|e| e.search_term == term) {
            entry.count += 1;
            return Ok(entry.clone());
        }

        let entry = TrendingEntry {
            id: document_id_for(term),
            search_term: term.to_string(),
            count: 1,
            poster_url: top_result.poster_url(MOCK_POSTER_BASE),
            movie_id: Some(top_result.id),
            created_at: None,
        };
        entries.push(entry.clone());
        Ok(entry)
    }

    async fn list_trending(&self, limit: usize) -> Result<Vec<TrendingEntry>, CounterStoreError> {
        *self.list_calls.write().await += 1;

        if let Some(err) = self.next_list_error.write().await.take() {
            return Err(err);
        }

        Ok(rank_trending(self.entries.read().await.clone(), limit))
    }
}
