use crate::models::message::Message;
use serde::{Deserialize, Serialize};

/// Inbound WebSocket events from client to server.
///
/// Note that neither event carries a sender field: the sender is always
/// the authenticated identity of the connection, so there is nothing for a
/// client to spoof. Missing string fields default to empty and are
/// rejected by validation rather than failing to parse.
#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum WsInboundEvent {
    #[serde(rename = "join")]
    Join {
        #[serde(rename = "receiverId", default)]
        receiver_id: String,
    },

    #[serde(rename = "sendMessage")]
    SendMessage {
        #[serde(rename = "receiverId", default)]
        receiver_id: String,
        #[serde(default)]
        message: String,
    },
}

/// Outbound WebSocket events from server to client.
#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub enum WsOutboundEvent {
    /// Full partner set, sent only to the requester after a join.
    #[serde(rename = "chatPartners")]
    ChatPartners { partners: Vec<String> },

    /// Ordered pair history, sent only to the requester after a join.
    #[serde(rename = "loadMessages")]
    LoadMessages { messages: Vec<Message> },

    /// A freshly persisted message, broadcast to all room subscribers
    /// (including the sender's own connection).
    #[serde(rename = "receiveMessage")]
    ReceiveMessage {
        #[serde(flatten)]
        message: Message,
    },

    /// Non-fatal failure; the connection stays open.
    #[serde(rename = "error")]
    Error { message: String },
}

impl WsOutboundEvent {
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }
}
