use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    response::IntoResponse,
};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD as B64URL;
use reqwest::Url;
use tracing::info;

use stillwater_types::api::{Claims, SubscribeRequest, SubscriptionResponse, UnsubscribeRequest};

use crate::error::ApiError;
use crate::state::AppState;

fn validate_endpoint(endpoint: &str) -> Result<(), ApiError> {
    let url = Url::parse(endpoint).map_err(|_| ApiError::BadRequest("Invalid endpoint".into()))?;
    match url.scheme() {
        "https" | "http" => Ok(()),
        _ => Err(ApiError::BadRequest("Endpoint must be http(s)".into())),
    }
}

/// Browsers hand out base64url keys; some pad them.
fn validate_key(name: &str, value: &str) -> Result<(), ApiError> {
    let trimmed = value.trim_end_matches('=');
    if trimmed.is_empty() || B64URL.decode(trimmed).is_err() {
        return Err(ApiError::BadRequest(format!("Invalid {name} key")));
    }
    Ok(())
}

/// POST /push-subscriptions — register (or re-point) the caller's device.
pub async fn subscribe(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    body: Result<Json<SubscribeRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(req) = body?;
    validate_endpoint(&req.endpoint)?;
    validate_key("p256dh", &req.keys.p256dh)?;
    validate_key("auth", &req.keys.auth)?;

    let db = state.clone();
    let endpoint = req.endpoint.clone();
    let user_id = claims.sub.clone();
    let id = tokio::task::spawn_blocking(move || {
        db.db
            .upsert_push_subscription(&user_id, &endpoint, &req.keys.p256dh, &req.keys.auth)
    })
    .await??;

    info!("Push subscription {} registered for {}", id, claims.sub);
    Ok((
        StatusCode::CREATED,
        Json(SubscriptionResponse {
            id: id.parse().map_err(|_| ApiError::Internal(format!("Corrupt subscription id {id}")))?,
            endpoint: req.endpoint,
        }),
    ))
}

/// DELETE /push-subscriptions
pub async fn unsubscribe(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    body: Result<Json<UnsubscribeRequest>, JsonRejection>,
) -> Result<StatusCode, ApiError> {
    let Json(req) = body?;
    let db = state.clone();
    let removed = tokio::task::spawn_blocking(move || {
        db.db.delete_push_subscription(&claims.sub, &req.endpoint)
    })
    .await??;

    if !removed {
        return Err(ApiError::NotFound("Subscription not found".into()));
    }
    Ok(StatusCode::NO_CONTENT)
}
