//! Per-connection session logic.
//!
//! Every accepted connection runs one `ChatSession` inside its own task.
//! Events from a single connection are handled strictly in arrival order;
//! sessions on different connections make progress independently and share
//! nothing but the registry and the stores. A session starts idle and
//! holds at most one active room subscription at a time.

use crate::error::{AppError, AppResult};
use crate::middleware::auth::Identity;
use crate::models::room::RoomKey;
use crate::models::user::is_valid_user_id;
use crate::services::{MessageService, RosterService};
use crate::state::AppState;
use crate::websocket::broadcast;
use crate::websocket::message_types::{WsInboundEvent, WsOutboundEvent};
use crate::websocket::SubscriberId;
use tokio::sync::mpsc::UnboundedReceiver;

struct ActiveRoom {
    key: RoomKey,
    subscriber_id: SubscriberId,
    rx: UnboundedReceiver<String>,
}

pub struct ChatSession {
    state: AppState,
    identity: Identity,
    room: Option<ActiveRoom>,
}

impl ChatSession {
    pub fn new(state: AppState, identity: Identity) -> Self {
        Self {
            state,
            identity,
            room: None,
        }
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    /// Handle one inbound event, returning the events to emit back to this
    /// connection only. Failures become a non-fatal `error` event; the
    /// connection stays usable.
    pub async fn handle_event(&mut self, event: WsInboundEvent) -> Vec<WsOutboundEvent> {
        let result = match event {
            WsInboundEvent::Join { receiver_id } => self.handle_join(&receiver_id).await,
            WsInboundEvent::SendMessage { receiver_id, message } => self
                .handle_send(&receiver_id, &message)
                .await
                .map(|_| Vec::new()),
        };

        match result {
            Ok(events) => events,
            Err(err) => vec![WsOutboundEvent::error(err.to_string())],
        }
    }

    /// Join the room shared with `receiver_id`: update the mutual roster,
    /// move this connection's subscription to the room, then send the
    /// caller its partner set and the pair's history.
    async fn handle_join(&mut self, receiver_id: &str) -> AppResult<Vec<WsOutboundEvent>> {
        let sender_id = self.identity.user_id.clone();

        if receiver_id.is_empty() {
            return Err(AppError::Validation("receiverId is required".into()));
        }
        if !is_valid_user_id(receiver_id) {
            return Err(AppError::Validation("receiverId contains invalid characters".into()));
        }
        if receiver_id == sender_id {
            return Err(AppError::Validation("cannot open a room with yourself".into()));
        }

        let key = RoomKey::for_pair(&sender_id, receiver_id);

        RosterService::mutual_upsert(&self.state.db, &sender_id, receiver_id)
            .await
            .map_err(|err| {
                tracing::warn!(user_id = %sender_id, receiver_id, error = %err, "roster upsert failed");
                err
            })?;

        self.resubscribe(&key).await;

        let partners = RosterService::partners(&self.state.db, &sender_id).await?;
        let messages = MessageService::history(&self.state.db, &sender_id, receiver_id).await?;

        tracing::info!(user_id = %sender_id, room = %key, "joined room");

        Ok(vec![
            WsOutboundEvent::ChatPartners { partners },
            WsOutboundEvent::LoadMessages { messages },
        ])
    }

    /// Move the live subscription to `key`. Re-joining the current room
    /// keeps the existing subscription rather than churning it.
    async fn resubscribe(&mut self, key: &RoomKey) {
        if self.room.as_ref().is_some_and(|room| &room.key == key) {
            return;
        }

        if let Some(previous) = self.room.take() {
            self.state
                .registry
                .remove_subscriber(&previous.key, previous.subscriber_id)
                .await;
        }

        let (subscriber_id, rx) = self.state.registry.add_subscriber(key).await;
        self.room = Some(ActiveRoom {
            key: key.clone(),
            subscriber_id,
            rx,
        });
    }

    /// Persist a message, then fan it out to the room's current
    /// subscribers. The append must succeed before any dispatch happens;
    /// on failure nothing is broadcast.
    async fn handle_send(&mut self, receiver_id: &str, body: &str) -> AppResult<()> {
        if self.room.is_none() {
            return Err(AppError::NotJoined);
        }
        if receiver_id.is_empty() || body.is_empty() {
            return Err(AppError::Validation("receiverId and message are required".into()));
        }
        if !is_valid_user_id(receiver_id) {
            return Err(AppError::Validation("receiverId contains invalid characters".into()));
        }

        let sender_id = self.identity.user_id.clone();

        let message = MessageService::append(&self.state.db, &sender_id, receiver_id, body)
            .await
            .map_err(|err| {
                tracing::warn!(user_id = %sender_id, receiver_id, error = %err, "message append failed");
                err
            })?;

        broadcast::dispatch(&self.state.registry, &message).await
    }

    /// Next payload dispatched to this connection's room, or pending
    /// forever while the session is idle.
    pub async fn next_broadcast(&mut self) -> Option<String> {
        match self.room.as_mut() {
            Some(room) => room.rx.recv().await,
            None => std::future::pending().await,
        }
    }

    /// Drop the live subscription. Called when the transport closes; any
    /// persistence triggered by earlier events has already completed
    /// because events are processed sequentially.
    pub async fn disconnect(&mut self) {
        if let Some(room) = self.room.take() {
            self.state
                .registry
                .remove_subscriber(&room.key, room.subscriber_id)
                .await;
        }
    }
}
