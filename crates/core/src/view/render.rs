//! Render model for the page.
//!
//! Pure functions from [`ViewState`] to serializable sections; the server
//! sends these to clients as JSON.

use serde::Serialize;

use super::controller::ViewOptions;
use super::state::ViewState;
use crate::catalog::{is_no_poster, Movie, PLACEHOLDER_POSTER};
use crate::counter_store::rank_trending;

/// Shown for missing card fields.
const NOT_AVAILABLE: &str = "N/A";

/// Everything the page displays.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PageView {
    pub search_term: String,
    pub trending: TrendingSection,
    pub all_movies: MoviesSection,
}

/// The trending section.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum TrendingSection {
    Loading,
    /// Nothing to show; the section is omitted.
    Hidden,
    List { items: Vec<TrendingItem> },
}

/// One numbered trending poster.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TrendingItem {
    /// Position starting at 1.
    pub rank: usize,
    pub search_term: String,
    pub poster: String,
}

/// The "all movies" section.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum MoviesSection {
    Loading,
    Error { message: String },
    Grid { cards: Vec<MovieCard> },
}

/// A movie card in the grid.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct MovieCard {
    pub id: u64,
    pub title: String,
    pub poster: String,
    /// Average vote with one decimal.
    pub rating: String,
    pub language: String,
    pub year: String,
}

impl MovieCard {
    pub fn from_movie(movie: &Movie, image_base_url: &str) -> Self {
        let poster = match movie.poster_path.as_deref().filter(|p| !p.is_empty()) {
            Some(_) => movie.poster_url(image_base_url),
            None => PLACEHOLDER_POSTER.to_string(),
        };

        let rating = movie
            .vote_average
            .filter(|v| *v > 0.0)
            .map(|v| format!("{:.1}", v))
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());

        let language = movie
            .original_language
            .clone()
            .filter(|l| !l.is_empty())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());

        let year = movie
            .release_date
            .as_deref()
            .and_then(|d| d.split('-').next())
            .filter(|y| !y.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());

        Self {
            id: movie.id,
            title: movie.title.clone(),
            poster,
            rating,
            language,
            year,
        }
    }
}

/// Render the whole page.
pub fn render(state: &ViewState, options: &ViewOptions) -> PageView {
    PageView {
        search_term: state.search_term().to_string(),
        trending: render_trending(state, options.trending_limit),
        all_movies: render_movies(state, &options.image_base_url),
    }
}

/// Render the trending section: at most `limit` entries, highest count first.
pub fn render_trending(state: &ViewState, limit: usize) -> TrendingSection {
    if state.is_loading_trending() {
        return TrendingSection::Loading;
    }
    if state.trending().is_empty() {
        return TrendingSection::Hidden;
    }

    let items = rank_trending(state.trending().to_vec(), limit)
        .into_iter()
        .enumerate()
        .map(|(index, entry)| TrendingItem {
            rank: index + 1,
            poster: if is_no_poster(&entry.poster_url) {
                PLACEHOLDER_POSTER.to_string()
            } else {
                entry.poster_url
            },
            search_term: entry.search_term,
        })
        .collect();

    TrendingSection::List { items }
}

/// Render the "all movies" section.
pub fn render_movies(state: &ViewState, image_base_url: &str) -> MoviesSection {
    if state.is_loading() {
        return MoviesSection::Loading;
    }
    if let Some(message) = state.error_message() {
        return MoviesSection::Error {
            message: message.to_string(),
        };
    }

    MoviesSection::Grid {
        cards: state
            .movies()
            .iter()
            .map(|movie| MovieCard::from_movie(movie, image_base_url))
            .collect(),
    }
}
