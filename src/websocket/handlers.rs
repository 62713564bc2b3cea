use crate::error::AuthError;
use crate::middleware::auth::{bearer_token, verify_token, Identity};
use crate::state::AppState;
use crate::websocket::message_types::{WsInboundEvent, WsOutboundEvent};
use crate::websocket::session::ChatSession;
use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tracing::{info, warn};

#[derive(Debug, Deserialize)]
pub struct WsParams {
    pub token: Option<String>,
}

/// Authenticate the handshake from the `token` query parameter or the
/// Authorization header. Runs before the upgrade: a connection that fails
/// here never gets a session.
fn authenticate_handshake(
    secret: &str,
    params: &WsParams,
    headers: &HeaderMap,
) -> Result<Identity, AuthError> {
    let token = params.token.clone().or_else(|| bearer_token(headers));

    match token {
        None => Err(AuthError::MissingToken),
        Some(token) => verify_token(secret, &token),
    }
}

pub async fn ws_handler(
    State(state): State<AppState>,
    Query(params): Query<WsParams>,
    headers: HeaderMap,
    ws: WebSocketUpgrade,
) -> Response {
    let identity = match authenticate_handshake(&state.config.jwt_secret, &params, &headers) {
        Ok(identity) => identity,
        Err(err) => {
            warn!(error = %err, "websocket connection rejected");
            return StatusCode::UNAUTHORIZED.into_response();
        }
    };

    ws.on_upgrade(move |socket| handle_socket(state, identity, socket))
}

async fn handle_socket(state: AppState, identity: Identity, socket: WebSocket) {
    info!(user_id = %identity.user_id, "websocket session started");

    let (mut sender, mut receiver) = socket.split();
    let mut session = ChatSession::new(state, identity);

    loop {
        tokio::select! {
            incoming = receiver.next() => match incoming {
                Some(Ok(Message::Text(text))) => {
                    let events = match serde_json::from_str::<WsInboundEvent>(&text) {
                        Ok(event) => session.handle_event(event).await,
                        Err(err) => {
                            warn!(user_id = %session.identity().user_id, error = %err, "unparseable client event");
                            vec![WsOutboundEvent::error("unrecognized event")]
                        }
                    };

                    let mut closed = false;
                    for event in events {
                        match serde_json::to_string(&event) {
                            Ok(payload) => {
                                if sender.send(Message::Text(payload.into())).await.is_err() {
                                    closed = true;
                                    break;
                                }
                            }
                            Err(err) => {
                                tracing::error!(error = %err, "failed to serialize outbound event");
                            }
                        }
                    }
                    if closed {
                        break;
                    }
                }
                Some(Ok(Message::Binary(_))) => {
                    warn!(user_id = %session.identity().user_id, "binary frames not supported");
                }
                // Ping/pong are answered by the framework.
                Some(Ok(Message::Ping(_) | Message::Pong(_))) => {}
                Some(Ok(Message::Close(_))) | None => break,
                Some(Err(err)) => {
                    warn!(user_id = %session.identity().user_id, error = %err, "websocket transport error");
                    break;
                }
            },
            Some(payload) = session.next_broadcast() => {
                if sender.send(Message::Text(payload.into())).await.is_err() {
                    break;
                }
            }
        }
    }

    session.disconnect().await;
    info!(user_id = %session.identity().user_id, "websocket session closed");
}
