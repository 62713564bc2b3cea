use crate::middleware::auth;
use crate::state::AppState;
use crate::websocket::handlers::ws_handler;
use axum::{
    middleware,
    routing::{get, post},
    Router,
};

pub mod users;

pub fn build_router(state: AppState) -> Router {
    // Registration API sits behind the bearer-token middleware. The
    // WebSocket endpoint authenticates during its own handshake instead
    // (browsers cannot set headers on WebSocket requests).
    let api_v1 = Router::new()
        .route("/users", post(users::register_user))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::auth_middleware,
        ));

    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/ws", get(ws_handler))
        .nest("/api/v1", api_v1)
        .with_state(state)
}
