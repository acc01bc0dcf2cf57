use axum::{
    Json,
    extract::{
        Query, State, WebSocketUpgrade,
        ws::{Message, WebSocket},
    },
    http::HeaderMap,
    response::Response,
};
use futures::{SinkExt as _, StreamExt as _};
use serde::Deserialize;
use tokio::sync::broadcast;
use tracing::debug;
use uuid::Uuid;

use market_auth_types::token::validate_access_token;

use crate::error::RealtimeError;
use crate::hub::Hub;
use crate::state::AppState;

// ── GET /channel ─────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct ChannelQuery {
    pub token: String,
}

/// Authenticate, then upgrade: the session is joined to the public group and
/// the caller's private group.
pub async fn channel(
    State(state): State<AppState>,
    Query(query): Query<ChannelQuery>,
    ws: WebSocketUpgrade,
) -> Result<Response, RealtimeError> {
    let info = validate_access_token(&query.token, &state.jwt_secret)
        .map_err(|_| RealtimeError::InvalidToken)?;
    let hub = state.hub.clone();
    Ok(ws.on_upgrade(move |socket| handle_socket(socket, hub, info.user_id)))
}

async fn handle_socket(socket: WebSocket, hub: Hub, user_id: Uuid) {
    let mut public_rx = hub.subscribe_public();
    let mut user_rx = hub.subscribe_user(user_id);
    let (mut sink, mut stream) = socket.split();
    debug!(%user_id, "session joined public and private groups");

    loop {
        tokio::select! {
            message = public_rx.recv() => match message {
                Ok(text) => {
                    if sink.send(Message::Text(text.into())).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    debug!(%user_id, skipped, "public group lagged");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
            message = user_rx.recv() => match message {
                Ok(text) => {
                    if sink.send(Message::Text(text.into())).await.is_err() {
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    debug!(%user_id, skipped, "private group lagged");
                }
                Err(broadcast::error::RecvError::Closed) => break,
            },
            // Inbound frames are drained only to detect disconnects; the
            // channel is one-way.
            incoming = stream.next() => match incoming {
                Some(Ok(_)) => {}
                _ => break,
            },
        }
    }

    drop(user_rx);
    hub.prune(user_id);
    debug!(%user_id, "session left");
}

// ── POST /internal/broadcast ─────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum BroadcastScope {
    Keyword(String),
    User { user: Uuid },
}

#[derive(Deserialize)]
pub struct BroadcastRequest {
    pub scope: BroadcastScope,
    pub event: String,
    #[serde(default)]
    pub payload: serde_json::Value,
}

pub async fn broadcast(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<BroadcastRequest>,
) -> Result<Json<serde_json::Value>, RealtimeError> {
    let secret = headers
        .get("x-internal-secret")
        .and_then(|v| v.to_str().ok());
    if secret != Some(state.internal_secret.as_str()) {
        return Err(RealtimeError::Forbidden);
    }

    let message = serde_json::json!({
        "event": body.event,
        "payload": body.payload,
    })
    .to_string();

    let delivered = match body.scope {
        BroadcastScope::Keyword(ref kw) if kw == "public" => state.hub.publish_public(message),
        BroadcastScope::User { user } => state.hub.publish_user(user, message),
        BroadcastScope::Keyword(_) => return Err(RealtimeError::InvalidScope),
    };

    Ok(Json(serde_json::json!({ "delivered": delivered })))
}
