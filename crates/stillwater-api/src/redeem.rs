use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use tracing::{info, warn};

use stillwater_types::api::{AccessCodeResponse, RedeemCodeRequest};

use crate::error::ApiError;
use crate::state::AppState;

fn required(field: Option<String>) -> Option<String> {
    field.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

/// POST /redeem-code — mark a single-use access code as used by `userId`.
pub async fn redeem_code(
    State(state): State<AppState>,
    body: Result<Json<RedeemCodeRequest>, JsonRejection>,
) -> Result<Json<AccessCodeResponse>, ApiError> {
    let Json(req) = body.map_err(|e| {
        warn!("Unreadable redeem body: {}", e);
        ApiError::BadRequest("Code and userId are required".into())
    })?;

    let (Some(code), Some(user_id)) = (required(req.code), required(req.user_id)) else {
        return Err(ApiError::BadRequest("Code and userId are required".into()));
    };
    let code = code.to_uppercase();

    let db = state.clone();
    let (cid, uid) = (code.clone(), user_id.clone());
    let row = tokio::task::spawn_blocking(move || db.db.redeem_access_code(&cid, &uid)).await??;

    let Some(row) = row else {
        warn!("Redeem rejected for code {}: already used or not found", code);
        return Err(ApiError::NotFound("Code already used or not found".into()));
    };

    info!("Access code {} redeemed by {}", row.code, user_id);
    Ok(Json(AccessCodeResponse {
        code: row.code,
        is_used: row.is_used,
        used_by: row.used_by,
        used_at: row.used_at,
    }))
}
