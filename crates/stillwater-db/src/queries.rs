use crate::models::{AccessCodeRow, NewNotification, NotificationRow, PushSubscriptionRow};
use crate::Database;
use anyhow::Result;
use chrono::{SecondsFormat, Utc};
use rusqlite::{Connection, Row};
use uuid::Uuid;

fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl Database {
    // -- Access codes --

    pub fn create_access_code(&self, code: &str) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute("INSERT INTO access_codes (code) VALUES (?1)", [code])?;
            Ok(())
        })
    }

    /// Compare-and-set redemption. Returns the updated row, or `None` when the
    /// code does not exist or was already used.
    pub fn redeem_access_code(&self, code: &str, user_id: &str) -> Result<Option<AccessCodeRow>> {
        self.with_conn(|conn| {
            conn.query_row(
                "UPDATE access_codes
                 SET is_used = 1, used_by = ?2, used_at = ?3
                 WHERE code = ?1 AND is_used = 0
                 RETURNING code, is_used, used_by, used_at",
                rusqlite::params![code, user_id, now_rfc3339()],
                access_code_from_row,
            )
            .optional()
        })
    }

    pub fn get_access_code(&self, code: &str) -> Result<Option<AccessCodeRow>> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT code, is_used, used_by, used_at FROM access_codes WHERE code = ?1",
                [code],
                access_code_from_row,
            )
            .optional()
        })
    }

    // -- Profiles --

    /// Create the profile if needed and set its opt-in flag.
    pub fn set_notifications_enabled(&self, user_id: &str, enabled: bool) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO profiles (id, notifications_enabled) VALUES (?1, ?2)
                 ON CONFLICT(id) DO UPDATE SET notifications_enabled = excluded.notifications_enabled",
                rusqlite::params![user_id, enabled],
            )?;
            Ok(())
        })
    }

    pub fn get_opted_in_user_ids(&self) -> Result<Vec<String>> {
        self.with_conn(|conn| {
            let mut stmt = conn
                .prepare("SELECT id FROM profiles WHERE notifications_enabled = 1 ORDER BY id")?;
            let ids = stmt
                .query_map([], |row| row.get::<_, String>(0))?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(ids)
        })
    }

    // -- Notifications --

    pub fn insert_notification(&self, notification: &NewNotification<'_>) -> Result<String> {
        let id = Uuid::new_v4().to_string();
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO notifications (id, user_id, title, body, type, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                rusqlite::params![
                    &id,
                    notification.user_id,
                    notification.title,
                    notification.body,
                    notification.notification_type,
                    now_rfc3339(),
                ],
            )?;
            Ok(())
        })?;
        Ok(id)
    }

    pub fn list_notifications(&self, user_id: &str, limit: u32) -> Result<Vec<NotificationRow>> {
        self.with_conn(|conn| query_notifications(conn, user_id, limit))
    }

    /// Returns false when the notification does not exist or belongs to someone else.
    pub fn mark_notification_read(&self, id: &str, user_id: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE notifications SET is_read = 1 WHERE id = ?1 AND user_id = ?2",
                [id, user_id],
            )?;
            Ok(changed > 0)
        })
    }

    // -- Push subscriptions --

    /// Insert or re-point a subscription by endpoint. Returns its id.
    pub fn upsert_push_subscription(
        &self,
        user_id: &str,
        endpoint: &str,
        p256dh: &str,
        auth: &str,
    ) -> Result<String> {
        let id = Uuid::new_v4().to_string();
        self.with_conn(|conn| {
            let stored: String = conn.query_row(
                "INSERT INTO push_subscriptions (id, user_id, endpoint, p256dh, auth)
                 VALUES (?1, ?2, ?3, ?4, ?5)
                 ON CONFLICT(endpoint) DO UPDATE SET
                     user_id = excluded.user_id,
                     p256dh = excluded.p256dh,
                     auth = excluded.auth
                 RETURNING id",
                rusqlite::params![&id, user_id, endpoint, p256dh, auth],
                |row| row.get(0),
            )?;
            Ok(stored)
        })
    }

    pub fn delete_push_subscription(&self, user_id: &str, endpoint: &str) -> Result<bool> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "DELETE FROM push_subscriptions WHERE user_id = ?1 AND endpoint = ?2",
                [user_id, endpoint],
            )?;
            Ok(changed > 0)
        })
    }

    /// Batch-fetch push subscriptions for a set of user IDs, querying in
    /// chunks so the bound parameter count stays under SQLite's limit.
    pub fn get_push_subscriptions_for_users(
        &self,
        user_ids: &[String],
    ) -> Result<Vec<PushSubscriptionRow>> {
        if user_ids.is_empty() {
            return Ok(vec![]);
        }

        self.with_conn(|conn| {
            let mut rows = Vec::new();
            for chunk in user_ids.chunks(SUBSCRIPTION_QUERY_CHUNK) {
                rows.extend(query_subscriptions_chunk(conn, chunk)?);
            }
            Ok(rows)
        })
    }
}

/// Parameters bound per subscription lookup.
const SUBSCRIPTION_QUERY_CHUNK: usize = 500;

fn query_subscriptions_chunk(conn: &Connection, user_ids: &[String]) -> Result<Vec<PushSubscriptionRow>> {
    let placeholders: Vec<String> = (1..=user_ids.len()).map(|i| format!("?{}", i)).collect();
    let sql = format!(
        "SELECT id, user_id, endpoint, p256dh, auth FROM push_subscriptions
         WHERE user_id IN ({})
         ORDER BY user_id, created_at",
        placeholders.join(", ")
    );

    let mut stmt = conn.prepare(&sql)?;
    let params: Vec<&dyn rusqlite::types::ToSql> = user_ids
        .iter()
        .map(|id| id as &dyn rusqlite::types::ToSql)
        .collect();

    let rows = stmt
        .query_map(params.as_slice(), |row| {
            Ok(PushSubscriptionRow {
                id: row.get(0)?,
                user_id: row.get(1)?,
                endpoint: row.get(2)?,
                p256dh: row.get(3)?,
                auth: row.get(4)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

fn access_code_from_row(row: &Row<'_>) -> rusqlite::Result<AccessCodeRow> {
    Ok(AccessCodeRow {
        code: row.get(0)?,
        is_used: row.get(1)?,
        used_by: row.get(2)?,
        used_at: row.get(3)?,
    })
}

fn query_notifications(conn: &Connection, user_id: &str, limit: u32) -> Result<Vec<NotificationRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, title, body, type, is_read, created_at
         FROM notifications
         WHERE user_id = ?1
         ORDER BY created_at DESC, rowid DESC
         LIMIT ?2",
    )?;

    let rows = stmt
        .query_map(rusqlite::params![user_id, limit], |row| {
            Ok(NotificationRow {
                id: row.get(0)?,
                user_id: row.get(1)?,
                title: row.get(2)?,
                body: row.get(3)?,
                notification_type: row.get(4)?,
                is_read: row.get(5)?,
                created_at: row.get(6)?,
            })
        })?
        .collect::<std::result::Result<Vec<_>, _>>()?;

    Ok(rows)
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
