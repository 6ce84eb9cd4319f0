//! Counter store documents.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Appwrite caps custom document IDs at 36 characters.
const DOCUMENT_ID_MAX_LEN: usize = 36;

/// A per-term counter document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TrendingEntry {
    /// Document ID.
    #[serde(rename = "$id")]
    pub id: String,
    /// The search text exactly as entered.
    #[serde(rename = "searchTerm")]
    pub search_term: String,
    /// Number of searches recorded for the term.
    pub count: u64,
    /// Poster of the movie that topped the first search.
    #[serde(default)]
    pub poster_url: String,
    /// Catalog ID of that movie.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub movie_id: Option<u64>,
    #[serde(
        rename = "$createdAt",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub created_at: Option<DateTime<Utc>>,
}

/// Deterministic document ID for a search term.
///
/// Concurrent first searches of the same term target the same document, so
/// only one create can win.
pub fn document_id_for(term: &str) -> String {
    let digest = format!("{:x}", Sha256::digest(term.as_bytes()));
    let prefix = "term-";
    format!("{}{}", prefix, &digest[..DOCUMENT_ID_MAX_LEN - prefix.len()])
}

/// Order entries by count, highest first, and keep at most `limit`.
///
/// Entries with equal counts keep their incoming order.
pub fn rank_trending(mut entries: Vec<TrendingEntry>, limit: usize) -> Vec<TrendingEntry> {
    entries.sort_by(|a, b| b.count.cmp(&a.count));
    entries.truncate(limit);
    entries
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(term: &str, count: u64) -> TrendingEntry {
        TrendingEntry {
            id: document_id_for(term),
            search_term: term.to_string(),
            count,
            poster_url: String::new(),
            movie_id: None,
            created_at: None,
        }
    }

    #[test]
    fn test_document_id_is_stable_and_bounded() {
        let id = document_id_for("batman");
        assert_eq!(id, document_id_for("batman"));
        assert_ne!(id, document_id_for("Batman"));
        assert_eq!(id.len(), 36);
        assert!(id.starts_with("term-"));
        assert!(id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-'));
    }

    #[test]
    fn test_rank_trending_orders_and_truncates() {
        let ranked = rank_trending(
            vec![
                entry("a", 3),
                entry("b", 9),
                entry("c", 1),
                entry("d", 7),
                entry("e", 5),
                entry("f", 8),
            ],
            5,
        );
        let counts: Vec<u64> = ranked.iter().map(|e| e.count).collect();
        assert_eq!(counts, vec![9, 8, 7, 5, 3]);
    }

    #[test]
    fn test_deserialize_appwrite_document() {
        let json = r#"{
            "$id": "term-abc",
            "$collectionId": "metrics",
            "$databaseId": "db",
            "$createdAt": "2025-03-01T10:15:00.000+00:00",
            "$updatedAt": "2025-03-02T10:15:00.000+00:00",
            "$permissions": [],
            "searchTerm": "batman",
            "count": 4,
            "movie_id": 268,
            "poster_url": "https://image.tmdb.org/t/p/w500/kBf3g.jpg"
        }"#;
        let entry: TrendingEntry = serde_json::from_str(json).unwrap();
        assert_eq!(entry.id, "term-abc");
        assert_eq!(entry.search_term, "batman");
        assert_eq!(entry.count, 4);
        assert_eq!(entry.movie_id, Some(268));
        assert!(entry.created_at.is_some());
    }
}
