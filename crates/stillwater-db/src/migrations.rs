use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS access_codes (
            code        TEXT PRIMARY KEY,
            is_used     INTEGER NOT NULL DEFAULT 0,
            used_by     TEXT,
            used_at     TEXT,
            created_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS profiles (
            id                      TEXT PRIMARY KEY,
            notifications_enabled   INTEGER NOT NULL DEFAULT 0,
            created_at              TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE TABLE IF NOT EXISTS notifications (
            id          TEXT PRIMARY KEY,
            user_id     TEXT NOT NULL,
            title       TEXT NOT NULL,
            body        TEXT NOT NULL,
            type        TEXT NOT NULL,
            is_read     INTEGER NOT NULL DEFAULT 0,
            created_at  TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_notifications_user
            ON notifications(user_id, created_at);

        CREATE TABLE IF NOT EXISTS push_subscriptions (
            id          TEXT PRIMARY KEY,
            user_id     TEXT NOT NULL,
            endpoint    TEXT NOT NULL UNIQUE,
            p256dh      TEXT NOT NULL,
            auth        TEXT NOT NULL,
            created_at  TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_push_subscriptions_user
            ON push_subscriptions(user_id);
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}
