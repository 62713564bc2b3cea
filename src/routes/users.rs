use crate::error::{AppError, AppResult};
use crate::middleware::auth::Identity;
use crate::models::user::is_valid_user_id;
use crate::services::RosterService;
use crate::state::AppState;
use axum::{extract::State, http::StatusCode, Extension, Json};
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize)]
pub struct RegisterUserRequest {
    #[serde(rename = "userId", default)]
    pub user_id: String,
    #[serde(default)]
    pub username: String,
}

/// Explicit user registration. Lazy creation during join covers unknown
/// ids with placeholder names; this endpoint is for callers that want a
/// chosen display name up front.
pub async fn register_user(
    State(state): State<AppState>,
    Extension(identity): Extension<Identity>,
    Json(req): Json<RegisterUserRequest>,
) -> AppResult<(StatusCode, Json<serde_json::Value>)> {
    if req.user_id.is_empty() || req.username.is_empty() {
        return Err(AppError::BadRequest("userId and username are required".into()));
    }
    if !is_valid_user_id(&req.user_id) {
        return Err(AppError::BadRequest("userId contains invalid characters".into()));
    }

    let user = RosterService::create_user(&state.db, &req.user_id, &req.username).await?;
    tracing::info!(user_id = %user.id, registered_by = %identity.user_id, "user registered");

    Ok((StatusCode::CREATED, Json(json!({ "user": user }))))
}
