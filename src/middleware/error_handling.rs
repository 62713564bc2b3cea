use crate::error::AppError;
use axum::http::StatusCode;
use axum::Json;
use serde_json::json;

/// Single place where errors become HTTP responses.
pub fn into_response(err: AppError) -> (StatusCode, Json<serde_json::Value>) {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(json!({ "error": err.to_string() })))
}
