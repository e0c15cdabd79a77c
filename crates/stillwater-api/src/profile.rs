use axum::{
    Extension, Json,
    extract::{State, rejection::JsonRejection},
};
use tracing::info;

use stillwater_types::api::{
    Claims, NotificationPreferenceRequest, NotificationPreferenceResponse,
};

use crate::error::ApiError;
use crate::state::AppState;

/// PUT /profile/notifications — opt the caller in or out of scheduled reminders.
pub async fn set_notification_preference(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    body: Result<Json<NotificationPreferenceRequest>, JsonRejection>,
) -> Result<Json<NotificationPreferenceResponse>, ApiError> {
    let Json(req) = body?;
    let db = state.clone();
    let user_id = claims.sub.clone();
    let enabled = req.enabled;
    tokio::task::spawn_blocking(move || db.db.set_notifications_enabled(&user_id, enabled)).await??;

    info!("User {} notifications_enabled={}", claims.sub, enabled);
    Ok(Json(NotificationPreferenceResponse {
        user_id: claims.sub,
        notifications_enabled: enabled,
    }))
}
