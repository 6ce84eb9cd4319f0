//! WebSocket search session tests against a locally served router.

mod common;

use std::time::Duration;

use futures::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::time::timeout;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::Message;

use common::{fixtures, TestFixture};

type WsStream =
    tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>;

async fn connect(fixture: &TestFixture) -> WsStream {
    let addr = fixture.serve().await;
    let (stream, _) = connect_async(format!("ws://{}/api/v1/ws", addr))
        .await
        .expect("Failed to connect WebSocket");
    stream
}

/// Read view messages until one satisfies `accept`.
async fn wait_for_view(stream: &mut WsStream, accept: impl Fn(&Value) -> bool) -> Value {
    timeout(Duration::from_secs(5), async {
        while let Some(message) = stream.next().await {
            let Message::Text(text) = message.expect("WebSocket error") else {
                continue;
            };
            let msg: Value = serde_json::from_str(&text).expect("Invalid server message");
            if msg["type"] == "view" && accept(&msg["view"]) {
                return msg;
            }
        }
        panic!("WebSocket closed before the expected view arrived");
    })
    .await
    .expect("Timed out waiting for view")
}

#[tokio::test]
async fn test_initial_view_lists_popular_movies() {
    let fixture = TestFixture::new();
    fixture
        .catalog
        .set_results("", vec![fixtures::movie(550, "Fight Club")])
        .await;
    fixture
        .counter_store
        .add_entry(fixtures::trending_entry("batman", 3))
        .await;

    let mut stream = connect(&fixture).await;

    let msg = wait_for_view(&mut stream, |view| {
        view["all_movies"]["state"] == "grid" && view["trending"]["state"] == "list"
    })
    .await;
    assert_eq!(msg["view"]["all_movies"]["cards"][0]["title"], "Fight Club");
    assert_eq!(msg["view"]["trending"]["items"][0]["search_term"], "batman");
    assert!(msg["revision"].as_u64().is_some());
}

#[tokio::test]
async fn test_input_produces_search_results() {
    let fixture = TestFixture::new();
    fixture
        .catalog
        .set_results("batman", vec![fixtures::movie(268, "Batman")])
        .await;

    let mut stream = connect(&fixture).await;
    stream
        .send(Message::Text(
            json!({ "type": "input", "text": "batman" }).to_string(),
        ))
        .await
        .expect("Failed to send input");

    let msg = wait_for_view(&mut stream, |view| {
        view["all_movies"]["state"] == "grid"
            && view["all_movies"]["cards"][0]["title"] == "Batman"
    })
    .await;
    assert_eq!(msg["view"]["search_term"], "batman");
    assert_eq!(fixture.catalog.count_for("batman").await, 1);

    assert!(
        fixture
            .counter_store
            .wait_for_recorded(1, Duration::from_secs(2))
            .await
    );
    assert_eq!(fixture.counter_store.recorded_searches().await[0].movie.id, 268);
}

#[tokio::test]
async fn test_malformed_input_keeps_session_open() {
    let fixture = TestFixture::new();
    fixture
        .catalog
        .set_results("joker", vec![fixtures::movie(475557, "Joker")])
        .await;

    let mut stream = connect(&fixture).await;
    stream
        .send(Message::Text("not json".to_string()))
        .await
        .expect("Failed to send garbage");
    stream
        .send(Message::Text(
            json!({ "type": "input", "text": "joker" }).to_string(),
        ))
        .await
        .expect("Failed to send input");

    wait_for_view(&mut stream, |view| {
        view["all_movies"]["cards"][0]["title"] == "Joker"
    })
    .await;
}
