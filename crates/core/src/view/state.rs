use serde::Serialize;

use crate::catalog::Movie;
use crate::counter_store::TrendingEntry;

/// Shown for any catalog failure that is not reported by the provider itself.
pub const FETCH_ERROR_MESSAGE: &str = "Error Fetching movies. Please try again later.";

/// State of one page.
///
/// Mutated only by [`ViewController`](super::ViewController); everything
/// else reads it through the accessors.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ViewState {
    search_term: String,
    settled_search_term: String,
    movies: Vec<Movie>,
    trending: Vec<TrendingEntry>,
    is_loading: bool,
    is_loading_trending: bool,
    error_message: Option<String>,
    /// Sequence number of the most recently issued catalog fetch.
    #[serde(skip)]
    latest_search: u64,
}

impl ViewState {
    /// Text as typed, updated on every keystroke.
    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    /// Debounced text that drove the latest catalog fetch.
    pub fn settled_search_term(&self) -> &str {
        &self.settled_search_term
    }

    pub fn movies(&self) -> &[Movie] {
        &self.movies
    }

    pub fn trending(&self) -> &[TrendingEntry] {
        &self.trending
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn is_loading_trending(&self) -> bool {
        self.is_loading_trending
    }

    /// Error for the "all movies" list, if the last fetch failed.
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub(super) fn set_search_term(&mut self, text: &str) {
        self.search_term = text.to_string();
    }

    /// Start a catalog fetch and return its sequence number.
    pub(super) fn begin_fetch(&mut self, query: &str) -> u64 {
        self.latest_search += 1;
        self.settled_search_term = query.to_string();
        self.is_loading = true;
        self.error_message = None;
        self.latest_search
    }

    /// Apply the result of fetch `seq` unless a newer fetch has started.
    ///
    /// Returns whether the result was applied.
    pub(super) fn finish_fetch(&mut self, seq: u64, result: Result<Vec<Movie>, String>) -> bool {
        if seq != self.latest_search {
            return false;
        }

        match result {
            Ok(movies) => {
                self.movies = movies;
                self.error_message = None;
            }
            Err(message) => {
                self.movies.clear();
                self.error_message = Some(message);
            }
        }
        self.is_loading = false;
        true
    }

    pub(super) fn begin_trending(&mut self) {
        self.is_loading_trending = true;
    }

    pub(super) fn finish_trending(&mut self, entries: Vec<TrendingEntry>) {
        self.trending = entries;
        self.is_loading_trending = false;
    }
}
