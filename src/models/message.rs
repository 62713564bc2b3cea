use chrono::{DateTime, Utc};
use serde::Serialize;

/// A persisted message between two users. Immutable once appended.
///
/// Serialization matches the wire protocol (`loadMessages` items and the
/// `receiveMessage` payload): the body goes out as `message`, the
/// timestamp as `createdAt`, and the storage id stays internal.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Message {
    #[serde(skip_serializing)]
    pub id: String,
    pub sender: String,
    pub receiver: String,
    #[serde(rename = "message")]
    pub body: String,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}
