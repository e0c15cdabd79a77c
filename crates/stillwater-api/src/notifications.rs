use axum::{
    Extension, Json,
    extract::{
        Path, Query, State,
        rejection::{PathRejection, QueryRejection},
    },
};
use chrono::{NaiveTime, Timelike};
use futures_util::future::join_all;
use serde::Deserialize;
use tracing::{info, warn};
use uuid::Uuid;

use stillwater_db::models::NewNotification;
use stillwater_types::api::{Claims, DispatchSummary, NotificationResponse, PushPayload};
use stillwater_types::models::NotificationType;

use crate::error::ApiError;
use crate::state::AppState;

/// Daily slots, matched exactly on (hour, minute).
const SLOTS: [(u32, u32, NotificationType); 5] = [
    (7, 0, NotificationType::MorningCheckin),
    (12, 0, NotificationType::MiddayPause),
    (15, 0, NotificationType::AfternoonReset),
    (18, 0, NotificationType::EveningReflection),
    (21, 0, NotificationType::BedtimeWinddown),
];

pub fn slot_for(at: NaiveTime) -> Option<NotificationType> {
    SLOTS
        .iter()
        .find(|(hour, minute, _)| at.hour() == *hour && at.minute() == *minute)
        .map(|(_, _, kind)| *kind)
}

/// GET|POST /send-notifications — run the dispatcher against the server clock.
pub async fn send_notifications(
    State(state): State<AppState>,
) -> Result<Json<DispatchSummary>, ApiError> {
    let now = state.local_time();
    Ok(Json(dispatch(&state, now).await?))
}

/// Writes one in-app notification per opted-in user and pushes to every
/// subscription they have. Inserts are not transactional: a failure part way
/// through leaves earlier rows in place. Nothing records that a slot already
/// ran, so a second call in the same minute sends again.
pub async fn dispatch(state: &AppState, at: NaiveTime) -> Result<DispatchSummary, ApiError> {
    let Some(kind) = slot_for(at) else {
        return Ok(DispatchSummary::noop(
            format!("No notification scheduled for {}", at.format("%H:%M")),
            None,
        ));
    };

    let db = state.clone();
    let (user_ids, subscriptions) = tokio::task::spawn_blocking(move || {
        let user_ids = db.db.get_opted_in_user_ids()?;
        if user_ids.is_empty() {
            return Ok::<_, anyhow::Error>((user_ids, Vec::new()));
        }

        for user_id in &user_ids {
            db.db.insert_notification(&NewNotification {
                user_id,
                title: kind.title(),
                body: kind.body(),
                notification_type: kind.as_str(),
            })?;
        }

        let subscriptions = db.db.get_push_subscriptions_for_users(&user_ids)?;
        Ok((user_ids, subscriptions))
    })
    .await??;

    if user_ids.is_empty() {
        info!("Slot {} matched but no users are opted in", kind);
        return Ok(DispatchSummary::noop("No users opted in", Some(kind)));
    }

    let payload = PushPayload {
        title: kind.title().to_string(),
        body: kind.body().to_string(),
        tag: kind.as_str().to_string(),
        url: state.app_url.clone(),
    };

    let results = join_all(
        subscriptions
            .iter()
            .map(|sub| state.push.send(&sub.endpoint, &payload)),
    )
    .await;

    let mut succeeded = 0;
    for (sub, result) in subscriptions.iter().zip(&results) {
        match result {
            Ok(()) => succeeded += 1,
            Err(e) => warn!("Push to {} for user {} failed: {}", sub.endpoint, sub.user_id, e),
        }
    }

    info!(
        "Dispatched {} to {} users, push {}/{} succeeded",
        kind,
        user_ids.len(),
        succeeded,
        results.len()
    );

    Ok(DispatchSummary {
        message: format!("Sent {} notifications", kind),
        notification_type: Some(kind),
        users_notified: user_ids.len(),
        push_attempted: results.len(),
        push_succeeded: succeeded,
    })
}

#[derive(Debug, Deserialize)]
pub struct NotificationQuery {
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_limit() -> u32 {
    50
}

/// GET /notifications — the caller's in-app notifications, newest first.
pub async fn list_notifications(
    State(state): State<AppState>,
    query: Result<Query<NotificationQuery>, QueryRejection>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<Vec<NotificationResponse>>, ApiError> {
    let Query(query) = query?;
    let db = state.clone();
    let limit = query.limit.min(200);
    let user_id = claims.sub;
    let rows = tokio::task::spawn_blocking(move || db.db.list_notifications(&user_id, limit)).await??;

    let notifications = rows
        .into_iter()
        .map(|row| NotificationResponse {
            id: row.id.parse().unwrap_or_else(|e| {
                warn!("Corrupt notification id '{}': {}", row.id, e);
                Uuid::default()
            }),
            created_at: row
                .created_at
                .parse::<chrono::DateTime<chrono::Utc>>()
                .unwrap_or_else(|e| {
                    warn!("Corrupt created_at '{}' on notification '{}': {}", row.created_at, row.id, e);
                    chrono::DateTime::default()
                }),
            title: row.title,
            body: row.body,
            notification_type: row.notification_type,
            is_read: row.is_read,
        })
        .collect();

    Ok(Json(notifications))
}

/// POST /notifications/{id}/read
pub async fn mark_read(
    State(state): State<AppState>,
    id: Result<Path<Uuid>, PathRejection>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let Path(id) = id?;
    let db = state.clone();
    let nid = id.to_string();
    let updated =
        tokio::task::spawn_blocking(move || db.db.mark_notification_read(&nid, &claims.sub)).await??;

    if !updated {
        return Err(ApiError::NotFound("Notification not found".into()));
    }
    Ok(Json(serde_json::json!({ "id": id, "isRead": true })))
}
