#![allow(dead_code)]

use direct_chat_service::{
    config::Config, db, middleware::auth::Claims, state::AppState, websocket::ConnectionRegistry,
};
use jsonwebtoken::{encode, EncodingKey, Header};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use std::net::SocketAddr;
use std::sync::Arc;

pub const TEST_SECRET: &str = "integration-test-secret";

/// In-memory database with the embedded migrations applied. A single
/// connection keeps every query on the same in-memory instance.
pub async fn test_pool() -> SqlitePool {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("connect in-memory sqlite");
    db::MIGRATOR.run(&pool).await.expect("run migrations");
    pool
}

pub fn test_state(db: SqlitePool) -> AppState {
    AppState {
        db,
        registry: ConnectionRegistry::new(),
        config: Arc::new(Config {
            database_url: "sqlite::memory:".into(),
            port: 0,
            jwt_secret: TEST_SECRET.into(),
        }),
    }
}

pub fn mint_token(user_id: &str) -> String {
    let claims = Claims {
        sub: user_id.to_string(),
        username: Some(format!("{user_id}-display")),
        exp: chrono::Utc::now().timestamp() + 3600,
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(TEST_SECRET.as_bytes()),
    )
    .expect("mint test token")
}

/// Serve the app on an ephemeral port and return its address.
pub async fn start_app(state: AppState) -> SocketAddr {
    let app = direct_chat_service::routes::build_router(state);
    let listener = tokio::net::TcpListener::bind(("127.0.0.1", 0))
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("serve test app");
    });
    addr
}
