use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::NotificationType;

// -- JWT Claims --

/// Bearer token claims for the user-facing routes. `sub` is the profile id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub exp: usize,
}

// -- Errors --

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

// -- Access codes --

/// Both fields are optional on the wire so a missing one maps to a 400
/// with an error body instead of a framework rejection.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RedeemCodeRequest {
    pub code: Option<String>,
    pub user_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessCodeResponse {
    pub code: String,
    pub is_used: bool,
    pub used_by: Option<String>,
    pub used_at: Option<String>,
}

// -- Notification dispatch --

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DispatchSummary {
    pub message: String,
    #[serde(rename = "type")]
    pub notification_type: Option<NotificationType>,
    pub users_notified: usize,
    pub push_attempted: usize,
    pub push_succeeded: usize,
}

impl DispatchSummary {
    pub fn noop(message: impl Into<String>, notification_type: Option<NotificationType>) -> Self {
        Self {
            message: message.into(),
            notification_type,
            users_notified: 0,
            push_attempted: 0,
            push_succeeded: 0,
        }
    }
}

/// Body posted to each push subscription endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PushPayload {
    pub title: String,
    pub body: String,
    pub tag: String,
    pub url: String,
}

// -- Push subscriptions --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct PushSubscriptionKeys {
    pub p256dh: String,
    pub auth: String,
}

/// Mirrors the browser's `PushSubscription.toJSON()` shape.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscribeRequest {
    pub endpoint: String,
    pub keys: PushSubscriptionKeys,
    #[serde(default)]
    pub expiration_time: Option<i64>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UnsubscribeRequest {
    pub endpoint: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionResponse {
    pub id: Uuid,
    pub endpoint: String,
}

// -- Profile --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct NotificationPreferenceRequest {
    pub enabled: bool,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationPreferenceResponse {
    pub user_id: String,
    pub notifications_enabled: bool,
}

// -- In-app notifications --

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationResponse {
    pub id: Uuid,
    pub title: String,
    pub body: String,
    #[serde(rename = "type")]
    pub notification_type: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}
