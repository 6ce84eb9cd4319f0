//! Types for catalog responses and poster references.

use serde::{Deserialize, Serialize};

/// Last path segment marking a poster URL that has no image behind it.
pub const NO_POSTER_SENTINEL: &str = "null";

/// Image shown when a movie or trending entry has no poster.
pub const PLACEHOLDER_POSTER: &str = "/no-movie.png";

/// A movie listing from the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Movie {
    /// Catalog movie ID.
    pub id: u64,
    /// Movie title.
    pub title: String,
    /// Poster path (relative to the image base URL).
    #[serde(default)]
    pub poster_path: Option<String>,
    /// Average vote (0-10).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vote_average: Option<f32>,
    /// ISO 639-1 language code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_language: Option<String>,
    /// Release date (YYYY-MM-DD).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
}

impl Movie {
    /// Get the release year from the release date.
    pub fn year(&self) -> Option<u32> {
        self.release_date
            .as_ref()
            .and_then(|d| d.split('-').next())
            .and_then(|y| y.parse().ok())
    }

    /// Absolute poster URL, or the sentinel URL when there is no poster.
    pub fn poster_url(&self, image_base_url: &str) -> String {
        poster_url(image_base_url, self.poster_path.as_deref())
    }
}

/// Which catalog endpoint serves a query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogEndpoint {
    /// Popular movies, most popular first.
    Discover,
    /// Free-text title search.
    Search,
}

impl CatalogEndpoint {
    pub fn for_query(query: &str) -> Self {
        if query.is_empty() {
            CatalogEndpoint::Discover
        } else {
            CatalogEndpoint::Search
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CatalogEndpoint::Discover => "discover",
            CatalogEndpoint::Search => "search",
        }
    }
}

/// Join an image base URL and a poster path.
///
/// A missing or empty path yields `{base}/null`, which [`is_no_poster`]
/// recognises.
pub fn poster_url(image_base_url: &str, poster_path: Option<&str>) -> String {
    let base = image_base_url.trim_end_matches('/');
    match poster_path.filter(|p| !p.is_empty()) {
        Some(path) => format!("{}/{}", base, path.trim_start_matches('/')),
        None => format!("{}/{}", base, NO_POSTER_SENTINEL),
    }
}

/// True when a poster URL carries no usable image.
pub fn is_no_poster(url: &str) -> bool {
    url.is_empty() || url.rsplit('/').next() == Some(NO_POSTER_SENTINEL)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_movie_year() {
        let movie = Movie {
            id: 1,
            title: "Test Movie".to_string(),
            poster_path: None,
            vote_average: None,
            original_language: None,
            release_date: Some("1999-03-31".to_string()),
        };
        assert_eq!(movie.year(), Some(1999));
    }

    #[test]
    fn test_movie_year_empty_date() {
        let movie: Movie =
            serde_json::from_str(r#"{"id": 2, "title": "Unreleased", "release_date": ""}"#)
                .unwrap();
        assert_eq!(movie.year(), None);
    }

    #[test]
    fn test_movie_ignores_unknown_fields() {
        let movie: Movie = serde_json::from_str(
            r#"{"id": 268, "title": "Batman", "poster_path": "/kBf3g.jpg",
                "adult": false, "popularity": 31.2, "genre_ids": [14, 28]}"#,
        )
        .unwrap();
        assert_eq!(movie.id, 268);
        assert_eq!(movie.poster_path.as_deref(), Some("/kBf3g.jpg"));
    }

    #[test]
    fn test_poster_url_joins_path() {
        assert_eq!(
            poster_url("https://image.tmdb.org/t/p/w500", Some("/abc.jpg")),
            "https://image.tmdb.org/t/p/w500/abc.jpg"
        );
        assert_eq!(
            poster_url("https://image.tmdb.org/t/p/w500/", Some("abc.jpg")),
            "https://image.tmdb.org/t/p/w500/abc.jpg"
        );
    }

    #[test]
    fn test_missing_poster_uses_sentinel() {
        let url = poster_url("https://image.tmdb.org/t/p/w500", None);
        assert_eq!(url, "https://image.tmdb.org/t/p/w500/null");
        assert!(is_no_poster(&url));
        assert!(is_no_poster(&poster_url("https://img", Some(""))));
    }

    #[test]
    fn test_real_poster_is_not_sentinel() {
        assert!(!is_no_poster("https://image.tmdb.org/t/p/w500/null.jpg"));
        assert!(!is_no_poster("https://image.tmdb.org/t/p/w500/abc.jpg"));
        assert!(is_no_poster(""));
    }

    #[test]
    fn test_endpoint_for_query() {
        assert_eq!(CatalogEndpoint::for_query(""), CatalogEndpoint::Discover);
        assert_eq!(CatalogEndpoint::for_query("batman"), CatalogEndpoint::Search);
        assert_eq!(CatalogEndpoint::for_query(" "), CatalogEndpoint::Search);
    }
}
