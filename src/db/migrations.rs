use rusqlite::Connection;

use crate::error::StoreError;

pub fn run_migrations(conn: &Connection) -> Result<(), StoreError> {
    conn.execute_batch("
        CREATE TABLE IF NOT EXISTS users (
            id          TEXT PRIMARY KEY,
            email       TEXT NOT NULL UNIQUE,
            first_name  TEXT NOT NULL,
            last_name   TEXT NOT NULL,
            birth_year  INTEGER NOT NULL,
            gender      TEXT NOT NULL CHECK(gender IN ('male','female')),
            created_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ','now')),
            updated_at  TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ','now'))
        );

        CREATE TABLE IF NOT EXISTS prayer_stats (
            id             INTEGER PRIMARY KEY AUTOINCREMENT,
            user_id        TEXT NOT NULL,
            prayer_name    TEXT NOT NULL,
            skipped_count  INTEGER NOT NULL DEFAULT 0
                           CHECK(typeof(skipped_count) = 'integer'),
            created_at     TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ','now')),
            updated_at     TEXT NOT NULL DEFAULT (strftime('%Y-%m-%dT%H:%M:%SZ','now')),
            UNIQUE(user_id, prayer_name)
        );

        CREATE INDEX IF NOT EXISTS idx_prayer_stats_user ON prayer_stats(user_id);
    ")?;
    Ok(())
}
