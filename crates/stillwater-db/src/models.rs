/// Database row types — these map directly to SQLite rows.
/// Distinct from stillwater-types API models to keep the DB layer independent.

#[derive(Debug, Clone)]
pub struct AccessCodeRow {
    pub code: String,
    pub is_used: bool,
    pub used_by: Option<String>,
    pub used_at: Option<String>,
}

#[derive(Debug, Clone)]
pub struct NotificationRow {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub body: String,
    pub notification_type: String,
    pub is_read: bool,
    pub created_at: String,
}

#[derive(Debug, Clone)]
pub struct PushSubscriptionRow {
    pub id: String,
    pub user_id: String,
    pub endpoint: String,
    pub p256dh: String,
    pub auth: String,
}

/// Insert payload for a single in-app notification.
pub struct NewNotification<'a> {
    pub user_id: &'a str,
    pub title: &'a str,
    pub body: &'a str,
    pub notification_type: &'a str,
}
