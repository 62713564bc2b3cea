use crate::error::{AppError, AuthError};
use crate::state::AppState;
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, errors::ErrorKind, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject - the user id. Defaulted so an absent claim surfaces as
    /// `MissingIdentityClaim` instead of a generic decode failure.
    #[serde(default)]
    pub sub: String,
    #[serde(default)]
    pub username: Option<String>,
    /// Expiration time (unix timestamp)
    pub exp: i64,
}

/// The trusted identity attached to a connection or request after its
/// credential has been validated. Whatever ids later payloads may claim,
/// this is the only sender identity the service uses.
#[derive(Debug, Clone)]
pub struct Identity {
    pub user_id: String,
    pub display_name: Option<String>,
}

/// Validate a bearer token (HS256) and extract the identity.
pub fn verify_token(secret: &str, token: &str) -> Result<Identity, AuthError> {
    let validation = Validation::new(Algorithm::HS256);
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation,
    )
    .map_err(|e| match e.kind() {
        ErrorKind::ExpiredSignature => AuthError::Expired,
        _ => AuthError::InvalidSignature,
    })?;

    if data.claims.sub.is_empty() {
        return Err(AuthError::MissingIdentityClaim);
    }

    Ok(Identity {
        user_id: data.claims.sub,
        display_name: data.claims.username,
    })
}

/// Extract a token from an `Authorization: Bearer` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(|s| s.to_string())
}

/// Middleware protecting the REST routes: validates the bearer token and
/// adds the resulting `Identity` to request extensions.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(req.headers()).ok_or(AuthError::MissingToken)?;
    let identity = verify_token(&state.config.jwt_secret, &token)?;
    req.extensions_mut().insert(identity);
    Ok(next.run(req).await)
}
