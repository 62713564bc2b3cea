use crate::error::AppResult;
use crate::models::{message::Message, room::RoomKey};
use crate::websocket::message_types::WsOutboundEvent;
use crate::websocket::ConnectionRegistry;

/// Deliver a persisted message to every connection currently subscribed to
/// its room.
///
/// Callers must only invoke this after the append has durably succeeded;
/// connections that join later get the message from their own history
/// fetch instead.
pub async fn dispatch(registry: &ConnectionRegistry, message: &Message) -> AppResult<()> {
    let room = RoomKey::for_pair(&message.sender, &message.receiver);
    let payload = serde_json::to_string(&WsOutboundEvent::ReceiveMessage {
        message: message.clone(),
    })?;

    registry.broadcast(&room, payload).await;
    Ok(())
}
