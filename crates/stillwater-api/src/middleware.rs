use axum::{
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{DecodingKey, Validation, decode};
use tracing::warn;

use stillwater_types::api::Claims;

use crate::error::ApiError;
use crate::state::AppState;

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
}

/// Extract and validate JWT from Authorization header.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = bearer_token(req.headers())
        .ok_or_else(|| ApiError::Unauthorized("Missing bearer token".into()))?;

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(state.jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|e| {
        warn!("Rejected bearer token: {}", e);
        ApiError::Unauthorized("Invalid token".into())
    })?;

    req.extensions_mut().insert(token_data.claims);
    Ok(next.run(req).await)
}

/// Guards the dispatch route when a cron secret is configured.
pub async fn require_cron_secret(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    if let Some(secret) = state.cron_secret.as_deref() {
        if bearer_token(req.headers()) != Some(secret) {
            warn!("Dispatch called without a valid cron secret");
            return Err(ApiError::Unauthorized("Invalid cron secret".into()));
        }
    }
    Ok(next.run(req).await)
}
