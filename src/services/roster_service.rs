use crate::error::{AppError, AppResult};
use crate::models::user::User;
use sqlx::SqlitePool;

/// Display name given to records created lazily during join, before the
/// user has registered one.
fn placeholder_display_name(id: &str) -> String {
    format!("User_{id}")
}

pub struct RosterService;

impl RosterService {
    /// Make `a` and `b` mutual chat partners.
    ///
    /// Ensures both user records exist (placeholder display name if
    /// absent), then adds each id to the other's partner set. Everything
    /// runs in one transaction: either both roster rows are durably
    /// committed or neither is. The conflict-ignoring inserts make the
    /// operation idempotent and safe against a concurrent upsert of the
    /// reversed pair.
    pub async fn mutual_upsert(db: &SqlitePool, a: &str, b: &str) -> AppResult<()> {
        let mut tx = db.begin().await?;

        for id in [a, b] {
            sqlx::query("INSERT INTO users (id, display_name) VALUES (?, ?) ON CONFLICT (id) DO NOTHING")
                .bind(id)
                .bind(placeholder_display_name(id))
                .execute(&mut *tx)
                .await?;
        }

        for (user_id, partner_id) in [(a, b), (b, a)] {
            sqlx::query(
                "INSERT INTO chat_partners (user_id, partner_id) VALUES (?, ?) ON CONFLICT (user_id, partner_id) DO NOTHING",
            )
            .bind(user_id)
            .bind(partner_id)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// The user's full partner set, sorted for deterministic output.
    pub async fn partners(db: &SqlitePool, user_id: &str) -> AppResult<Vec<String>> {
        let rows: Vec<(String,)> =
            sqlx::query_as("SELECT partner_id FROM chat_partners WHERE user_id = ? ORDER BY partner_id")
                .bind(user_id)
                .fetch_all(db)
                .await?;

        Ok(rows.into_iter().map(|(partner_id,)| partner_id).collect())
    }

    /// Explicit registration: create a user record with a chosen display
    /// name, rejecting ids that are already taken.
    pub async fn create_user(db: &SqlitePool, id: &str, display_name: &str) -> AppResult<User> {
        let existing: Option<(String,)> = sqlx::query_as("SELECT id FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(db)
            .await?;
        if existing.is_some() {
            return Err(AppError::BadRequest("userId already exists".into()));
        }

        sqlx::query("INSERT INTO users (id, display_name) VALUES (?, ?)")
            .bind(id)
            .bind(display_name)
            .execute(db)
            .await?;

        Ok(User {
            id: id.to_string(),
            display_name: display_name.to_string(),
            partners: Vec::new(),
        })
    }
}
