//! Appwrite Databases counter store.
//!
//! Documents live in one collection with the attributes `searchTerm`,
//! `count`, `movie_id` and `poster_url`. Counts are bumped with the
//! server-side increment endpoint so concurrent searches never lose updates.

use async_trait::async_trait;
use reqwest::header::ACCEPT;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use super::types::{document_id_for, rank_trending, TrendingEntry};
use super::{CounterStore, CounterStoreError};
use crate::catalog::Movie;
use crate::config::CounterStoreConfig;
use crate::metrics::COUNTER_STORE_OPERATIONS;

/// Appwrite-backed counter store.
pub struct AppwriteCounterStore {
    client: Client,
    documents_url: String,
    project_id: String,
    api_key: Option<String>,
    poster_base_url: String,
}

/// Result of trying to create a counter document.
enum CreateOutcome {
    Created(TrendingEntry),
    AlreadyExists,
}

impl AppwriteCounterStore {
    /// Create a new store client.
    ///
    /// `poster_base_url` is the catalog image prefix used to build the
    /// representative poster of newly counted terms.
    pub fn new(
        config: &CounterStoreConfig,
        poster_base_url: impl Into<String>,
    ) -> Result<Self, CounterStoreError> {
        if config.project_id.is_empty() {
            return Err(CounterStoreError::NotConfigured(
                "Appwrite project ID is required".to_string(),
            ));
        }
        if config.database_id.is_empty() || config.collection_id.is_empty() {
            return Err(CounterStoreError::NotConfigured(
                "Appwrite database and collection IDs are required".to_string(),
            ));
        }

        let client = Client::builder().timeout(config.timeout()).build()?;

        let documents_url = format!(
            "{}/databases/{}/collections/{}/documents",
            config.endpoint.trim_end_matches('/'),
            urlencoding::encode(&config.database_id),
            urlencoding::encode(&config.collection_id)
        );

        Ok(Self {
            client,
            documents_url,
            project_id: config.project_id.clone(),
            api_key: config.api_key.clone().filter(|k| !k.is_empty()),
            poster_base_url: poster_base_url.into(),
        })
    }

    fn request(&self, builder: RequestBuilder) -> RequestBuilder {
        let builder = builder
            .header("X-Appwrite-Project", &self.project_id)
            .header(ACCEPT, "application/json");
        match &self.api_key {
            Some(key) => builder.header("X-Appwrite-Key", key),
            None => builder,
        }
    }

    async fn list_documents(
        &self,
        queries: &[String],
    ) -> Result<Vec<TrendingEntry>, CounterStoreError> {
        let params: Vec<(&str, &str)> = queries
            .iter()
            .map(|q| ("queries[]", q.as_str()))
            .collect();

        let response = self
            .request(self.client.get(&self.documents_url))
            .query(&params)
            .send()
            .await?;
        let response = check_status(response).await?;

        let list: DocumentList = response.json().await.map_err(|e| {
            CounterStoreError::ParseError(format!("Failed to parse document list: {}", e))
        })?;

        Ok(list.documents)
    }

    async fn find_by_term(&self, term: &str) -> Result<Option<TrendingEntry>, CounterStoreError> {
        let documents = self
            .list_documents(&[query_equal("searchTerm", term), query_limit(1)])
            .await?;
        Ok(documents.into_iter().next())
    }

    async fn increment(&self, document_id: &str) -> Result<TrendingEntry, CounterStoreError> {
        let url = format!(
            "{}/{}/count/increment",
            self.documents_url,
            urlencoding::encode(document_id)
        );

        let response = self
            .request(self.client.patch(&url))
            .json(&json!({ "value": 1 }))
            .send()
            .await?;
        let response = check_status(response).await?;

        response.json().await.map_err(|e| {
            CounterStoreError::ParseError(format!("Failed to parse incremented document: {}", e))
        })
    }

    async fn create(
        &self,
        document_id: &str,
        term: &str,
        movie: &Movie,
    ) -> Result<CreateOutcome, CounterStoreError> {
        let body = json!({
            "documentId": document_id,
            "data": {
                "searchTerm": term,
                "count": 1,
                "movie_id": movie.id,
                "poster_url": movie.poster_url(&self.poster_base_url),
            }
        });

        let response = self
            .request(self.client.post(&self.documents_url))
            .json(&body)
            .send()
            .await?;

        if response.status() == StatusCode::CONFLICT {
            return Ok(CreateOutcome::AlreadyExists);
        }
        let response = check_status(response).await?;

        let entry = response.json().await.map_err(|e| {
            CounterStoreError::ParseError(format!("Failed to parse created document: {}", e))
        })?;
        Ok(CreateOutcome::Created(entry))
    }

    async fn upsert(&self, term: &str, movie: &Movie) -> Result<TrendingEntry, CounterStoreError> {
        if let Some(existing) = self.find_by_term(term).await? {
            debug!(
                "Incrementing search count for '{}' (document {})",
                term, existing.id
            );
            return self.increment(&existing.id).await;
        }

        let document_id = document_id_for(term);
        match self.create(&document_id, term, movie).await? {
            CreateOutcome::Created(entry) => {
                debug!("Created search counter for '{}' ({})", term, entry.id);
                Ok(entry)
            }
            CreateOutcome::AlreadyExists => {
                debug!(
                    "Search counter for '{}' created concurrently, incrementing",
                    term
                );
                self.increment(&document_id).await
            }
        }
    }
}

#[async_trait]
impl CounterStore for AppwriteCounterStore {
    async fn record_search(
        &self,
        term: &str,
        top_result: &Movie,
    ) -> Result<TrendingEntry, CounterStoreError> {
        let result = self.upsert(term, top_result).await;
        COUNTER_STORE_OPERATIONS
            .with_label_values(&["record_search", if result.is_ok() { "ok" } else { "error" }])
            .inc();
        result
    }

    async fn list_trending(&self, limit: usize) -> Result<Vec<TrendingEntry>, CounterStoreError> {
        debug!("Listing top {} trending searches", limit);

        let result = self
            .list_documents(&[query_order_desc("count"), query_limit(limit)])
            .await
            .map(|documents| rank_trending(documents, limit));

        COUNTER_STORE_OPERATIONS
            .with_label_values(&["list_trending", if result.is_ok() { "ok" } else { "error" }])
            .inc();
        result
    }
}

/// Turn a non-success response into an `ApiError` carrying Appwrite's message.
async fn check_status(response: Response) -> Result<Response, CounterStoreError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<AppwriteError>(&body)
        .map(|e| e.message)
        .unwrap_or(body);

    Err(CounterStoreError::ApiError {
        status: status.as_u16(),
        message,
    })
}

// ============================================================================
// Appwrite query strings (JSON query syntax, Appwrite >= 1.5)
// ============================================================================

fn query_equal(attribute: &str, value: &str) -> String {
    json!({ "method": "equal", "attribute": attribute, "values": [value] }).to_string()
}

fn query_order_desc(attribute: &str) -> String {
    json!({ "method": "orderDesc", "attribute": attribute }).to_string()
}

fn query_limit(limit: usize) -> String {
    json!({ "method": "limit", "values": [limit] }).to_string()
}

// ============================================================================
// Appwrite API Response Types (private)
// ============================================================================

#[derive(Debug, Deserialize)]
struct DocumentList {
    #[serde(default)]
    documents: Vec<TrendingEntry>,
}

#[derive(Debug, Deserialize)]
struct AppwriteError {
    message: String,
}
