use crate::{config::Config, websocket::ConnectionRegistry};
use sqlx::SqlitePool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub registry: ConnectionRegistry,
    pub config: Arc<Config>,
}
