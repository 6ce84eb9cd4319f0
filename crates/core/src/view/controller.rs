use std::sync::Arc;

use tokio::sync::{watch, RwLock};
use tracing::{debug, error, warn};

use super::render::{render, PageView};
use super::state::{ViewState, FETCH_ERROR_MESSAGE};
use crate::catalog::{FailureKind, Movie, MovieCatalog};
use crate::config::Config;
use crate::counter_store::{rank_trending, CounterStore};
use crate::metrics::STALE_RESPONSES_DISCARDED;

/// Rendering and loading options for a view.
#[derive(Debug, Clone)]
pub struct ViewOptions {
    /// Maximum number of trending entries loaded and shown.
    pub trending_limit: usize,
    /// Prefix for movie card posters.
    pub image_base_url: String,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            trending_limit: 5,
            image_base_url: "https://image.tmdb.org/t/p/w500".to_string(),
        }
    }
}

impl From<&Config> for ViewOptions {
    fn from(config: &Config) -> Self {
        Self {
            trending_limit: config.search.trending_limit,
            image_base_url: config.catalog.image_base_url.clone(),
        }
    }
}

/// What happened to a catalog fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Results replaced the movie list.
    Loaded { count: usize },
    /// The fetch failed and the error message was shown.
    Failed { kind: FailureKind },
    /// A newer fetch started before this one finished; the result was dropped.
    Discarded,
}

/// Owns and mutates the state of one page.
///
/// The movie list and the trending list load independently: a failure in
/// one never touches the other.
pub struct ViewController {
    catalog: Arc<dyn MovieCatalog>,
    counter_store: Arc<dyn CounterStore>,
    options: ViewOptions,
    state: RwLock<ViewState>,
    revision: watch::Sender<u64>,
}

impl ViewController {
    pub fn new(
        catalog: Arc<dyn MovieCatalog>,
        counter_store: Arc<dyn CounterStore>,
        options: ViewOptions,
    ) -> Self {
        let (revision, _) = watch::channel(0);
        Self {
            catalog,
            counter_store,
            options,
            state: RwLock::new(ViewState::default()),
            revision,
        }
    }

    pub fn options(&self) -> &ViewOptions {
        &self.options
    }

    /// Copy of the current state.
    pub async fn snapshot(&self) -> ViewState {
        self.state.read().await.clone()
    }

    /// Render the current state.
    pub async fn render(&self) -> PageView {
        render(&*self.state.read().await, &self.options)
    }

    /// Receiver bumped after every state change.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    pub fn revision(&self) -> u64 {
        *self.revision.borrow()
    }

    /// Record the text as typed. Does not fetch anything.
    pub async fn set_search_term(&self, text: &str) {
        self.update(|state| state.set_search_term(text)).await;
    }

    /// Initial load when the page opens.
    pub async fn mount(&self) {
        self.load_trending().await;
    }

    /// Load the trending list.
    ///
    /// A failure hides the trending section; it is logged, never surfaced.
    pub async fn load_trending(&self) {
        self.update(|state| state.begin_trending()).await;

        let limit = self.options.trending_limit;
        let entries = match self.counter_store.list_trending(limit).await {
            Ok(entries) => rank_trending(entries, limit),
            Err(e) => {
                warn!("Error fetching trending movies: {}", e);
                Vec::new()
            }
        };

        self.update(|state| state.finish_trending(entries)).await;
    }

    /// Fetch movies for a settled query and update the "all movies" list.
    ///
    /// A non-empty query with at least one result also records the search in
    /// the counter store on a detached task.
    pub async fn fetch_movies(&self, query: &str) -> FetchOutcome {
        let seq = self.update(|state| state.begin_fetch(query)).await;

        let result = self.catalog.fetch_movies(query).await;

        if let Ok(movies) = &result {
            if let Some(top_result) = movies.first().filter(|_| !query.is_empty()) {
                self.spawn_record_search(query, top_result.clone());
            }
        }

        let (applied_result, outcome) = match result {
            Ok(movies) => {
                let count = movies.len();
                (Ok(movies), FetchOutcome::Loaded { count })
            }
            Err(e) => {
                let kind = e.failure_kind();
                let message = match kind {
                    FailureKind::Provider => {
                        warn!("Catalog reported a failed search for '{}': {}", query, e);
                        e.to_string()
                    }
                    FailureKind::Network => {
                        error!("Error fetching movies: {}", e);
                        FETCH_ERROR_MESSAGE.to_string()
                    }
                };
                (Err(message), FetchOutcome::Failed { kind })
            }
        };

        let applied = self
            .update(|state| state.finish_fetch(seq, applied_result))
            .await;
        if !applied {
            debug!("Discarding stale results for query '{}'", query);
            STALE_RESPONSES_DISCARDED.inc();
            return FetchOutcome::Discarded;
        }

        outcome
    }

    fn spawn_record_search(&self, term: &str, top_result: Movie) {
        let store = Arc::clone(&self.counter_store);
        let term = term.to_string();

        tokio::spawn(async move {
            match store.record_search(&term, &top_result).await {
                Ok(entry) => debug!("Search '{}' now counted {} times", term, entry.count),
                Err(e) => warn!("Failed to update search count for '{}': {}", term, e),
            }
        });
    }

    async fn update<R>(&self, f: impl FnOnce(&mut ViewState) -> R) -> R {
        let result = {
            let mut state = self.state.write().await;
            f(&mut state)
        };
        self.revision.send_modify(|revision| *revision += 1);
        result
    }
}
