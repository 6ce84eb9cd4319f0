pub mod catalog;
pub mod config;
pub mod counter_store;
pub mod debounce;
pub mod metrics;
pub mod testing;
pub mod view;

pub use catalog::{
    CatalogEndpoint, CatalogError, FailureKind, Movie, MovieCatalog, TmdbCatalog,
    DEFAULT_PROVIDER_ERROR, PLACEHOLDER_POSTER,
};
pub use config::{
    load_config, load_config_from_str, validate_config, CatalogConfig, Config, ConfigError,
    CounterStoreConfig, SanitizedConfig, SearchConfig, ServerConfig,
};
pub use counter_store::{AppwriteCounterStore, CounterStore, CounterStoreError, TrendingEntry};
pub use debounce::{DebounceState, Debouncer, DEFAULT_DEBOUNCE};
pub use view::{
    render_movies, render_trending, FetchOutcome, MovieCard, MoviesSection, PageView,
    SearchSession, TrendingItem, TrendingSection, ViewController, ViewOptions, ViewState,
    FETCH_ERROR_MESSAGE,
};
