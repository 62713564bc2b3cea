use crate::models::room::RoomKey;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{
    mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender},
    RwLock,
};
use uuid::Uuid;

pub mod broadcast;
pub mod handlers;
pub mod message_types;
pub mod session;

/// Unique identifier for a room subscriber.
///
/// Each connection gets a fresh subscriber id when it joins a room, which
/// allows precise removal when it re-joins elsewhere or disconnects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriberId(Uuid);

impl SubscriberId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for SubscriberId {
    fn default() -> Self {
        Self::new()
    }
}

/// Subscriber entry with ID and channel
struct Subscriber {
    id: SubscriberId,
    sender: UnboundedSender<String>,
}

/// Live subscription registry: which connections are currently subscribed
/// to which room.
///
/// This is the only shared mutable state outside the database. It is
/// mutated by the room router on join/disconnect and read by the broadcast
/// dispatcher; membership stays consistent under concurrent access because
/// every operation takes the registry lock.
#[derive(Default, Clone)]
pub struct ConnectionRegistry {
    // room key -> list of subscribers
    inner: Arc<RwLock<HashMap<RoomKey, Vec<Subscriber>>>>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a subscriber to a room.
    ///
    /// Returns the subscriber id (used for cleanup) and the channel on
    /// which the subscriber receives dispatched payloads.
    pub async fn add_subscriber(&self, room: &RoomKey) -> (SubscriberId, UnboundedReceiver<String>) {
        let (tx, rx) = unbounded_channel();
        let subscriber_id = SubscriberId::new();

        let mut guard = self.inner.write().await;
        guard.entry(room.clone()).or_default().push(Subscriber {
            id: subscriber_id,
            sender: tx,
        });

        tracing::debug!(
            %room,
            subscribers = guard.get(room).map(|v| v.len()).unwrap_or(0),
            "added subscriber"
        );

        (subscriber_id, rx)
    }

    /// Remove a specific subscriber from a room. Must be called when the
    /// connection leaves the room or closes, or its entry leaks.
    pub async fn remove_subscriber(&self, room: &RoomKey, subscriber_id: SubscriberId) {
        let mut guard = self.inner.write().await;

        if let Some(subscribers) = guard.get_mut(room) {
            subscribers.retain(|s| s.id != subscriber_id);
            if subscribers.is_empty() {
                guard.remove(room);
            }
            tracing::debug!(%room, "removed subscriber");
        }
    }

    /// Deliver a payload to every current subscriber of a room.
    /// Dead senders (connections that went away without cleanup) are
    /// dropped along the way.
    pub async fn broadcast(&self, room: &RoomKey, payload: String) {
        let mut guard = self.inner.write().await;
        if let Some(subscribers) = guard.get_mut(room) {
            subscribers.retain(|subscriber| subscriber.sender.send(payload.clone()).is_ok());
        }
    }

    /// Current subscriber count for a room (for tests and debugging).
    pub async fn subscriber_count(&self, room: &RoomKey) -> usize {
        let guard = self.inner.read().await;
        guard.get(room).map(|v| v.len()).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn add_and_remove_subscriber() {
        let registry = ConnectionRegistry::new();
        let room = RoomKey::for_pair("alice", "bob");

        let (subscriber_id, mut rx) = registry.add_subscriber(&room).await;
        assert_eq!(registry.subscriber_count(&room).await, 1);

        registry.remove_subscriber(&room, subscriber_id).await;
        assert_eq!(registry.subscriber_count(&room).await, 0);

        // Receiver is closed once the registry dropped its sender.
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test]
    async fn broadcast_reaches_all_subscribers() {
        let registry = ConnectionRegistry::new();
        let room = RoomKey::for_pair("alice", "bob");

        let (_, mut rx1) = registry.add_subscriber(&room).await;
        let (_, mut rx2) = registry.add_subscriber(&room).await;

        registry.broadcast(&room, "payload".to_string()).await;

        assert_eq!(rx1.recv().await.unwrap(), "payload");
        assert_eq!(rx2.recv().await.unwrap(), "payload");
    }

    #[tokio::test]
    async fn broadcast_does_not_cross_rooms() {
        let registry = ConnectionRegistry::new();
        let room_ab = RoomKey::for_pair("alice", "bob");
        let room_ac = RoomKey::for_pair("alice", "carol");

        let (_, mut rx) = registry.add_subscriber(&room_ac).await;
        registry.broadcast(&room_ab, "payload".to_string()).await;

        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn broadcast_drops_dead_senders() {
        let registry = ConnectionRegistry::new();
        let room = RoomKey::for_pair("alice", "bob");

        let (_, rx) = registry.add_subscriber(&room).await;
        drop(rx);
        registry.broadcast(&room, "payload".to_string()).await;

        assert_eq!(registry.subscriber_count(&room).await, 0);
    }
}
