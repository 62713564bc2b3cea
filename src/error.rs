use crate::middleware::error_handling;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error_handling::into_response(self).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;

/// Handshake authentication failures. All of these are terminal for the
/// connection: the upgrade is refused and no session task is spawned.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("authentication failed: no token provided")]
    MissingToken,

    #[error("authentication failed: invalid token")]
    InvalidSignature,

    #[error("authentication failed: token expired")]
    Expired,

    #[error("authentication failed: token does not contain a user id")]
    MissingIdentityClaim,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("server start failure: {0}")]
    StartServer(String),

    #[error("bad request: {0}")]
    BadRequest(String),

    #[error(transparent)]
    Unauthorized(#[from] AuthError),

    #[error("{0}")]
    Validation(String),

    #[error("no active room: send a join event before sending messages")]
    NotJoined,

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("internal server error")]
    Internal,
}

impl AppError {
    /// Returns HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            AppError::BadRequest(_) | AppError::Validation(_) | AppError::NotJoined => 400,
            AppError::Unauthorized(_) => 401,
            AppError::Database(_) | AppError::Serialization(_) | AppError::Internal => 500,
            _ => 500,
        }
    }
}
