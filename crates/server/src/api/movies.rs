//! One-shot movie and trending lookups.

use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    Json,
};
use marquee_core::{render_movies, render_trending, FetchOutcome, MoviesSection, TrendingSection};
use serde::Deserialize;

use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct MoviesParams {
    /// Search text. Missing or empty lists popular movies.
    #[serde(default)]
    pub query: String,
}

/// GET /api/v1/movies?query=
///
/// Runs one catalog fetch and returns the rendered movie section. A
/// successful search with results is counted for the trending list.
pub async fn list_movies(
    State(state): State<Arc<AppState>>,
    Query(params): Query<MoviesParams>,
) -> (StatusCode, Json<MoviesSection>) {
    let controller = state.new_controller();
    let outcome = controller.fetch_movies(&params.query).await;

    let snapshot = controller.snapshot().await;
    let section = render_movies(&snapshot, &controller.options().image_base_url);

    let status = match outcome {
        FetchOutcome::Failed { .. } => StatusCode::BAD_GATEWAY,
        _ => StatusCode::OK,
    };
    (status, Json(section))
}

/// GET /api/v1/trending
///
/// A counter store failure renders the section as hidden.
pub async fn list_trending(State(state): State<Arc<AppState>>) -> Json<TrendingSection> {
    let controller = state.new_controller();
    controller.load_trending().await;

    let snapshot = controller.snapshot().await;
    Json(render_trending(&snapshot, controller.options().trending_limit))
}
