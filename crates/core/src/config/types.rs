use serde::{Deserialize, Serialize};
use std::net::IpAddr;
use std::time::Duration;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    pub catalog: CatalogConfig,
    pub counter_store: CounterStoreConfig,
    #[serde(default)]
    pub search: SearchConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: IpAddr,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> IpAddr {
    IpAddr::from([0, 0, 0, 0])
}

fn default_port() -> u16 {
    8080
}

/// Movie catalog (TMDB) configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CatalogConfig {
    /// Bearer token sent in the Authorization header.
    pub api_token: String,
    /// API base URL (default: https://api.themoviedb.org/3).
    #[serde(default = "default_catalog_base_url")]
    pub base_url: String,
    /// Prefix for poster paths, including the size segment.
    #[serde(default = "default_image_base_url")]
    pub image_base_url: String,
    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

impl CatalogConfig {
    /// Catalog config with default endpoints and the given token.
    pub fn with_token(api_token: impl Into<String>) -> Self {
        Self {
            api_token: api_token.into(),
            base_url: default_catalog_base_url(),
            image_base_url: default_image_base_url(),
            timeout_secs: default_timeout(),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(u64::from(self.timeout_secs))
    }
}

fn default_catalog_base_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_image_base_url() -> String {
    "https://image.tmdb.org/t/p/w500".to_string()
}

/// Counter store (Appwrite database) configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CounterStoreConfig {
    /// Appwrite API endpoint, including the `/v1` suffix.
    #[serde(default = "default_counter_store_endpoint")]
    pub endpoint: String,
    pub project_id: String,
    pub database_id: String,
    pub collection_id: String,
    /// Server API key. Optional when the collection allows guest writes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

impl CounterStoreConfig {
    pub fn new(
        project_id: impl Into<String>,
        database_id: impl Into<String>,
        collection_id: impl Into<String>,
    ) -> Self {
        Self {
            endpoint: default_counter_store_endpoint(),
            project_id: project_id.into(),
            database_id: database_id.into(),
            collection_id: collection_id.into(),
            api_key: None,
            timeout_secs: default_timeout(),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(u64::from(self.timeout_secs))
    }
}

fn default_counter_store_endpoint() -> String {
    "https://cloud.appwrite.io/v1".to_string()
}

fn default_timeout() -> u32 {
    30
}

/// Search behaviour configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SearchConfig {
    /// Quiet period before typed text is searched, in milliseconds.
    #[serde(default = "default_debounce_ms")]
    pub debounce_ms: u64,
    /// Maximum number of trending entries shown.
    #[serde(default = "default_trending_limit")]
    pub trending_limit: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            debounce_ms: default_debounce_ms(),
            trending_limit: default_trending_limit(),
        }
    }
}

impl SearchConfig {
    pub fn debounce(&self) -> Duration {
        Duration::from_millis(self.debounce_ms)
    }
}

fn default_debounce_ms() -> u64 {
    700
}

fn default_trending_limit() -> usize {
    5
}

/// Sanitized config for API responses (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub server: ServerConfig,
    pub catalog: SanitizedCatalogConfig,
    pub counter_store: SanitizedCounterStoreConfig,
    pub search: SearchConfig,
}

/// Sanitized catalog config (token hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedCatalogConfig {
    pub base_url: String,
    pub image_base_url: String,
    pub api_token_configured: bool,
    pub timeout_secs: u32,
}

/// Sanitized counter store config (API key hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedCounterStoreConfig {
    pub endpoint: String,
    pub project_id: String,
    pub database_id: String,
    pub collection_id: String,
    pub api_key_configured: bool,
    pub timeout_secs: u32,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        let store = &config.counter_store;
        Self {
            server: config.server.clone(),
            catalog: SanitizedCatalogConfig {
                base_url: config.catalog.base_url.clone(),
                image_base_url: config.catalog.image_base_url.clone(),
                api_token_configured: !config.catalog.api_token.is_empty(),
                timeout_secs: config.catalog.timeout_secs,
            },
            counter_store: SanitizedCounterStoreConfig {
                endpoint: store.endpoint.clone(),
                project_id: store.project_id.clone(),
                database_id: store.database_id.clone(),
                collection_id: store.collection_id.clone(),
                api_key_configured: store.api_key.as_deref().is_some_and(|k| !k.is_empty()),
                timeout_secs: store.timeout_secs,
            },
            search: config.search.clone(),
        }
    }
}
