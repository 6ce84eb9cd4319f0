//! WebSocket search sessions.
//!
//! Each connection drives its own [`SearchSession`]: the client sends what
//! the user types, the server answers with the rendered page after every
//! state change.

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
};
use futures::{SinkExt, StreamExt};
use marquee_core::{PageView, SearchSession, ViewController};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{interval_at, Instant};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::metrics::{
    WS_CONNECTIONS_ACTIVE, WS_CONNECTIONS_TOTAL, WS_INVALID_MESSAGES, WS_MESSAGES_SENT,
};
use crate::state::AppState;

/// Interval between heartbeats.
const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(30);

/// Message sent by the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    /// Current contents of the search box.
    Input { text: String },
}

/// Message sent to the client.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerMessage {
    /// The page after a state change.
    View { revision: u64, view: PageView },
    /// Server heartbeat (sent periodically to keep connection alive).
    Heartbeat { timestamp: i64 },
}

impl ServerMessage {
    fn metric_label(&self) -> &'static str {
        match self {
            ServerMessage::View { .. } => "view",
            ServerMessage::Heartbeat { .. } => "heartbeat",
        }
    }
}

/// WebSocket upgrade handler.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

/// Handle a single WebSocket connection.
async fn handle_socket(socket: WebSocket, state: Arc<AppState>) {
    let session_id = Uuid::new_v4();
    let (mut sender, mut receiver) = socket.split();

    let session = SearchSession::start(state.new_controller(), state.debounce());
    let controller = Arc::clone(session.controller());

    // Track connection metrics
    WS_CONNECTIONS_TOTAL.inc();
    WS_CONNECTIONS_ACTIVE.inc();

    info!("Search session {} connected", session_id);

    // Forward every state change, plus heartbeats, to this client
    let send_task = tokio::spawn(async move {
        let mut revisions = controller.subscribe();
        let mut heartbeat = interval_at(Instant::now() + HEARTBEAT_INTERVAL, HEARTBEAT_INTERVAL);

        // The initial page goes out before any change
        revisions.borrow_and_update();
        if !send_view(&mut sender, &controller).await {
            return;
        }

        loop {
            tokio::select! {
                changed = revisions.changed() => {
                    if changed.is_err() {
                        debug!("View controller dropped");
                        break;
                    }
                    revisions.borrow_and_update();
                    if !send_view(&mut sender, &controller).await {
                        break;
                    }
                }
                _ = heartbeat.tick() => {
                    let msg = ServerMessage::Heartbeat {
                        timestamp: chrono::Utc::now().timestamp(),
                    };
                    if !send_message(&mut sender, &msg).await {
                        break;
                    }
                }
            }
        }
    });

    // Handle incoming messages from client
    while let Some(result) = receiver.next().await {
        match result {
            Ok(Message::Text(text)) => match serde_json::from_str::<ClientMessage>(&text) {
                Ok(ClientMessage::Input { text }) => session.input(&text).await,
                Err(e) => {
                    warn!("Ignoring malformed message from {}: {}", session_id, e);
                    WS_INVALID_MESSAGES.inc();
                }
            },
            Ok(Message::Close(_)) => {
                debug!("Search session {} requested close", session_id);
                break;
            }
            Ok(_) => {
                // Ping/pong is handled by axum; binary frames are ignored
            }
            Err(e) => {
                warn!("WebSocket receive error: {}", e);
                break;
            }
        }
    }

    // Clean up
    send_task.abort();
    drop(session);
    WS_CONNECTIONS_ACTIVE.dec();
    info!("Search session {} disconnected", session_id);
}

/// Render and send the current page. Returns false once the client is gone.
async fn send_view<S>(sender: &mut S, controller: &ViewController) -> bool
where
    S: SinkExt<Message> + Unpin,
{
    let msg = ServerMessage::View {
        revision: controller.revision(),
        view: controller.render().await,
    };
    send_message(sender, &msg).await
}

async fn send_message<S>(sender: &mut S, msg: &ServerMessage) -> bool
where
    S: SinkExt<Message> + Unpin,
{
    let json = match serde_json::to_string(msg) {
        Ok(json) => json,
        Err(e) => {
            error!("Failed to serialize ServerMessage: {}", e);
            return true;
        }
    };

    WS_MESSAGES_SENT
        .with_label_values(&[msg.metric_label()])
        .inc();

    if sender.send(Message::Text(json.into())).await.is_err() {
        debug!("WebSocket send failed, client disconnected");
        return false;
    }
    true
}
