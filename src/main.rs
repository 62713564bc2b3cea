use direct_chat_service::{config, db, error, logging, routes, state::AppState, websocket::ConnectionRegistry};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<(), error::AppError> {
    logging::init_tracing();
    let cfg = Arc::new(config::Config::from_env()?);

    // Initialize DB pool and run embedded migrations (idempotent)
    let db = db::init_pool(&cfg.database_url)
        .await
        .map_err(|e| error::AppError::StartServer(format!("db: {e}")))?;

    let registry = ConnectionRegistry::new();

    let state = AppState {
        db,
        registry,
        config: cfg.clone(),
    };

    let bind_addr = format!("0.0.0.0:{}", cfg.port);
    tracing::info!(%bind_addr, "starting direct-chat-service");

    let app = routes::build_router(state);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| error::AppError::StartServer(format!("bind: {e}")))?;

    axum::serve(listener, app)
        .await
        .map_err(|e| error::AppError::StartServer(e.to_string()))
}
