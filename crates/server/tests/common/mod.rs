//! Common test utilities for in-process API testing with mocks.
//!
//! This module provides a test fixture that builds the full router with mock
//! catalog and counter store clients injected, so routes can be exercised
//! without network access.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;

use marquee_core::{
    load_config_from_str, testing::{MockCatalog, MockCounterStore}, Config, CounterStore,
    MovieCatalog,
};

/// Re-export fixtures for test convenience
pub use marquee_core::testing::fixtures;

const TEST_CONFIG: &str = r#"
[server]
host = "127.0.0.1"
port = 8080

[catalog]
api_token = "test-token"

[counter_store]
project_id = "marquee"
database_id = "movies-db"
collection_id = "metrics"
api_key = "secret-key"
"#;

/// Test fixture with controllable catalog and counter store mocks.
///
/// # Example
///
/// ```rust,ignore
/// #[tokio::test]
/// async fn test_search() {
///     let fixture = TestFixture::new();
///     fixture.catalog.set_results("batman", vec![fixtures::movie(1, "Batman")]).await;
///
///     let response = fixture.get("/api/v1/movies?query=batman").await;
///     assert_eq!(response.status, 200);
/// }
/// ```
pub struct TestFixture {
    /// The Axum router for testing
    pub router: Router,
    /// Mock catalog - configure results and failures
    pub catalog: Arc<MockCatalog>,
    /// Mock counter store - inspect recorded searches, seed trending
    pub counter_store: Arc<MockCounterStore>,
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl TestFixture {
    /// Create a new test fixture with default mocks.
    pub fn new() -> Self {
        let config: Config = load_config_from_str(TEST_CONFIG).expect("Invalid test config");

        let catalog = Arc::new(MockCatalog::new());
        let counter_store = Arc::new(MockCounterStore::new());

        let state = Arc::new(marquee_server::state::AppState::new(
            config,
            Arc::clone(&catalog) as Arc<dyn MovieCatalog>,
            Arc::clone(&counter_store) as Arc<dyn CounterStore>,
        ));

        let router = marquee_server::api::create_router(state);

        Self {
            router,
            catalog,
            counter_store,
        }
    }

    /// Serve the router on an ephemeral local port.
    ///
    /// The server runs until the test runtime shuts down.
    pub async fn serve(&self) -> SocketAddr {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind test listener");
        let addr = listener.local_addr().expect("Failed to read local addr");

        let router = self.router.clone();
        tokio::spawn(async move {
            axum::serve(listener, router).await.ok();
        });

        addr
    }

    /// Send a GET request to the test server.
    pub async fn get(&self, path: &str) -> TestResponse {
        let request = Request::builder()
            .method("GET")
            .uri(path)
            .body(Body::empty())
            .unwrap();

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let body_bytes = response
            .into_body()
            .collect()
            .await
            .expect("Failed to collect body")
            .to_bytes();

        let body: Value = if body_bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body_bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&body_bytes).into()))
        };

        TestResponse { status, body }
    }
}

/// Helper to assert a response has expected status.
#[macro_export]
macro_rules! assert_status {
    ($response:expr, $status:expr) => {
        assert_eq!(
            $response.status, $status,
            "Expected status {:?}, got {:?}. Body: {}",
            $status,
            $response.status,
            serde_json::to_string_pretty(&$response.body).unwrap_or_default()
        );
    };
}
