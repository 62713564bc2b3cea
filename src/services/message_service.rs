use crate::error::AppResult;
use crate::models::{message::Message, room::RoomKey};
use chrono::Utc;
use sqlx::SqlitePool;
use uuid::Uuid;

pub struct MessageService;

impl MessageService {
    /// Persist a message and return the stored record. `created_at` is
    /// assigned here, at persistence time; it is the sort key for replay.
    pub async fn append(
        db: &SqlitePool,
        sender: &str,
        receiver: &str,
        body: &str,
    ) -> AppResult<Message> {
        let message = Message {
            id: Uuid::new_v4().to_string(),
            sender: sender.to_string(),
            receiver: receiver.to_string(),
            body: body.to_string(),
            created_at: Utc::now(),
        };
        let pair_key = RoomKey::for_pair(sender, receiver);

        sqlx::query(
            "INSERT INTO messages (id, pair_key, sender, receiver, body, created_at) VALUES (?, ?, ?, ?, ?, ?)",
        )
        .bind(&message.id)
        .bind(pair_key.as_str())
        .bind(&message.sender)
        .bind(&message.receiver)
        .bind(&message.body)
        .bind(message.created_at)
        .execute(db)
        .await?;

        Ok(message)
    }

    /// All messages exchanged between the unordered pair `{a, b}`, in
    /// either direction, ascending by `created_at` (insertion order for
    /// equal timestamps). No pagination: the result is the full log for
    /// the pair.
    pub async fn history(db: &SqlitePool, a: &str, b: &str) -> AppResult<Vec<Message>> {
        let pair_key = RoomKey::for_pair(a, b);

        let messages = sqlx::query_as::<_, Message>(
            "SELECT id, sender, receiver, body, created_at FROM messages WHERE pair_key = ? ORDER BY created_at ASC, seq ASC",
        )
        .bind(pair_key.as_str())
        .fetch_all(db)
        .await?;

        Ok(messages)
    }
}
