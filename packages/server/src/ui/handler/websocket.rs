//! WebSocket connection handlers.

use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::{
        ConnectInfo, State,
        ws::{Message, WebSocket, WebSocketUpgrade},
    },
    http::{HeaderMap, StatusCode, header},
    response::IntoResponse,
};
use axum_extra::extract::CookieJar;
use futures_util::{sink::SinkExt, stream::StreamExt};
use tokio::sync::mpsc;

use crate::{
    domain::{BroadcastEvent, ConnectionId, ConnectionMetadata, EventName, Identity, RoomId},
    infrastructure::dto::websocket::{ControlMessage, InboundFrame, ServerEnvelope, parse_inbound},
    ui::state::AppState,
    usecase::Handshake,
};

const X_FORWARDED_FOR: &str = "x-forwarded-for";
const BINARY_FRAME_REJECTED: &str = "binary frames are not supported, send JSON text frames";

pub async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<AppState>>,
    ConnectInfo(peer): ConnectInfo<SocketAddr>,
    jar: CookieJar,
    headers: HeaderMap,
) -> Result<impl IntoResponse, StatusCode> {
    let handshake = Handshake {
        session_cookie: jar
            .get(&state.session_cookie)
            .map(|cookie| cookie.value().to_string()),
        authorization: header_str(&headers, header::AUTHORIZATION.as_str()),
        metadata: ConnectionMetadata {
            address: Some(origin_address(&headers, peer)),
            user_agent: header_str(&headers, header::USER_AGENT.as_str()),
        },
    };

    // Validation happens before the upgrade so a rejected handshake never
    // reaches the registry.
    let identity = match state.connect_client_usecase.authorize(&handshake).await {
        Ok(identity) => identity,
        Err(e) => {
            tracing::warn!(
                address = handshake.metadata.address.as_deref().unwrap_or("unknown"),
                "Rejected realtime handshake: {}",
                e
            );
            return Err(StatusCode::UNAUTHORIZED);
        }
    };

    Ok(ws.on_upgrade(move |socket| handle_socket(socket, state, identity, handshake.metadata)))
}

fn header_str(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}

/// First `X-Forwarded-For` hop, else the peer address.
fn origin_address(headers: &HeaderMap, peer: SocketAddr) -> String {
    header_str(headers, X_FORWARDED_FOR)
        .and_then(|value| {
            value
                .split(',')
                .map(str::trim)
                .find(|hop| !hop.is_empty())
                .map(str::to_string)
        })
        .unwrap_or_else(|| peer.ip().to_string())
}

/// Spawns a task that receives messages from the rx channel and pushes them to the WebSocket sender.
///
/// This function handles the outbound message flow: the welcome frame, replies
/// and broadcasts (via rx channel) are sent to this client's WebSocket connection.
fn pusher_loop(
    mut rx: mpsc::UnboundedReceiver<String>,
    mut sender: futures_util::stream::SplitSink<WebSocket, Message>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            if sender.send(Message::Text(msg.into())).await.is_err() {
                break;
            }
        }
    })
}

async fn handle_socket(
    socket: WebSocket,
    state: Arc<AppState>,
    identity: Identity,
    metadata: ConnectionMetadata,
) {
    let (sender, mut receiver) = socket.split();

    // Create a channel for this client to receive messages
    let (tx, rx) = mpsc::unbounded_channel();

    // Register the connection; the welcome frame is queued before anything else
    let registered = state
        .connect_client_usecase
        .execute(identity, metadata, tx, |id| {
            ServerEnvelope::welcome(id.as_str()).to_json()
        })
        .await;
    let client_id = registered.id;

    let client_id_clone = client_id.clone();
    let state_clone = state.clone();

    // Spawn a task to receive messages from this client, strictly in order
    let mut recv_task = tokio::spawn(async move {
        while let Some(msg) = receiver.next().await {
            let msg = match msg {
                Ok(msg) => msg,
                Err(e) => {
                    tracing::warn!("WebSocket error on '{}': {}", client_id_clone, e);
                    break;
                }
            };

            match msg {
                Message::Text(text) => {
                    tracing::debug!("Received text from '{}': {}", client_id_clone, text);
                    handle_text(&state_clone, &client_id_clone, text.as_str()).await;
                }
                Message::Binary(_) => {
                    tracing::debug!("Rejecting binary frame from '{}'", client_id_clone);
                    let envelope = ServerEnvelope::error(BINARY_FRAME_REJECTED);
                    reply(&state_clone, &client_id_clone, envelope).await;
                }
                Message::Close(_) => {
                    tracing::info!("Client '{}' requested close", client_id_clone);
                    break;
                }
                // Ping/pong is handled automatically by the WebSocket protocol
                _ => {}
            }
        }
    });

    // Spawn a task to push queued frames to this client
    let mut send_task = pusher_loop(rx, sender);

    // If any one of the tasks completes, abort the other
    tokio::select! {
        _ = &mut recv_task => send_task.abort(),
        _ = &mut send_task => recv_task.abort(),
    };

    // Disconnect path: leave every room, then drop the registry entry
    state.disconnect_client_usecase.execute(&client_id).await;
}

async fn handle_text(state: &AppState, client_id: &ConnectionId, text: &str) {
    let control = match parse_inbound(text) {
        InboundFrame::Control(control) => control,
        InboundFrame::Application(value) => {
            reply(state, client_id, ServerEnvelope::echo(&value)).await;
            return;
        }
        InboundFrame::Malformed(reason) => {
            tracing::warn!("Malformed control message from '{}': {}", client_id, reason);
            let message = format!("malformed control message: {reason}");
            reply(state, client_id, ServerEnvelope::error(message)).await;
            return;
        }
    };

    match control {
        ControlMessage::UserConnected { name } => {
            if let Err(e) = state.announce_identity_usecase.execute(client_id, name).await {
                reply(state, client_id, ServerEnvelope::error(e.to_string())).await;
            }
        }
        ControlMessage::Join { room } => {
            let envelope = match state.room_membership_usecase.join(client_id, room).await {
                Ok(room_id) => ServerEnvelope::joined(room_id.as_str()),
                Err(e) => ServerEnvelope::error(e.to_string()),
            };
            reply(state, client_id, envelope).await;
        }
        ControlMessage::Leave { room } => {
            let envelope = match state.room_membership_usecase.leave(client_id, room).await {
                Ok(room_id) => ServerEnvelope::left(room_id.as_str()),
                Err(e) => ServerEnvelope::error(e.to_string()),
            };
            reply(state, client_id, envelope).await;
        }
        ControlMessage::Broadcast { room, event, data } => {
            let event = match build_peer_broadcast(room, event, data) {
                Ok(event) => event.from_connection(client_id.clone()),
                Err(message) => {
                    reply(state, client_id, ServerEnvelope::error(message)).await;
                    return;
                }
            };
            if let Err(e) = state.broadcast_event_usecase.execute(event).await {
                tracing::warn!("Broadcast from '{}' skipped: {}", client_id, e);
            }
        }
    }
}

fn build_peer_broadcast(
    room: Option<String>,
    event: String,
    data: serde_json::Value,
) -> Result<BroadcastEvent, String> {
    let event = EventName::new(event).map_err(|e| format!("invalid event name: {e}"))?;
    match room {
        Some(room) => {
            let room_id = RoomId::new(room).map_err(|e| format!("invalid room id: {e}"))?;
            Ok(BroadcastEvent::to_room(room_id, event, data))
        }
        None => Ok(BroadcastEvent::to_all(event, data)),
    }
}

async fn reply(state: &AppState, client_id: &ConnectionId, envelope: ServerEnvelope) {
    if let Err(e) = state
        .reply_usecase
        .execute(client_id, &envelope.to_json())
        .await
    {
        tracing::warn!("Failed to reply to '{}': {}", client_id, e);
    }
}
