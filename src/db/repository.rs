use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use std::str::FromStr;

use crate::error::StoreError;
use crate::models::{Gender, NewProfile, PrayerRecord, PrayerType, UserProfile};

fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(s)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

// ─── Prayer stats ────────────────────────────────────────────────────────────

pub struct PrayerStatsRepo;

impl PrayerStatsRepo {
    pub fn get_for_user(conn: &Connection, user_id: &str) -> Result<Vec<PrayerRecord>, StoreError> {
        let mut stmt = conn.prepare(
            "SELECT user_id, prayer_name, skipped_count, created_at, updated_at
             FROM prayer_stats WHERE user_id = ?1
             ORDER BY prayer_name",
        )?;

        let rows = stmt.query_map(params![user_id], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, i64>(2)?,
                row.get::<_, String>(3)?,
                row.get::<_, String>(4)?,
            ))
        })?;

        let mut result = Vec::new();
        for r in rows {
            let (user_id, prayer_name, skipped_count, created_at, updated_at) = r?;
            let prayer_type =
                PrayerType::from_str(&prayer_name).map_err(|_| StoreError::InvalidRow {
                    column: "prayer_name",
                    value: prayer_name.clone(),
                })?;
            result.push(PrayerRecord {
                user_id,
                prayer_type,
                skipped_count,
                created_at: parse_timestamp(&created_at),
                updated_at: parse_timestamp(&updated_at),
            });
        }
        Ok(result)
    }

    /// `skipped_count += delta` in one statement; a missing row starts at `delta`.
    ///
    /// A sum outside the `i64` range violates the column's type check, so the
    /// statement fails and the stored count is left as it was.
    pub fn increment(
        conn: &Connection,
        user_id: &str,
        prayer: PrayerType,
        delta: i64,
    ) -> Result<(), StoreError> {
        conn.execute(
            "INSERT INTO prayer_stats (user_id, prayer_name, skipped_count) VALUES (?1, ?2, ?3)
             ON CONFLICT(user_id, prayer_name) DO UPDATE SET
                skipped_count = skipped_count + excluded.skipped_count,
                updated_at = strftime('%Y-%m-%dT%H:%M:%SZ','now')",
            params![user_id, prayer.as_str(), delta],
        )?;
        Ok(())
    }

    /// Six zero rows for a new user. Existing rows are left untouched.
    pub fn seed(conn: &Connection, user_id: &str) -> Result<(), StoreError> {
        for pt in PrayerType::all() {
            conn.execute(
                "INSERT OR IGNORE INTO prayer_stats (user_id, prayer_name, skipped_count)
                 VALUES (?1, ?2, 0)",
                params![user_id, pt.as_str()],
            )?;
        }
        Ok(())
    }
}

// ─── Users ───────────────────────────────────────────────────────────────────

pub struct UserRepo;

impl UserRepo {
    pub fn next_local_id(conn: &Connection) -> Result<String, StoreError> {
        let next: i64 = conn.query_row(
            "SELECT COALESCE(MAX(rowid), 0) + 1 FROM users",
            [],
            |row| row.get(0),
        )?;
        Ok(format!("local-{}", next))
    }

    pub fn insert(conn: &Connection, user_id: &str, profile: &NewProfile) -> Result<(), StoreError> {
        conn.execute(
            "INSERT INTO users (id, email, first_name, last_name, birth_year, gender)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                user_id,
                profile.email,
                profile.first_name,
                profile.last_name,
                profile.birth_year,
                profile.gender.as_str(),
            ],
        )?;
        Ok(())
    }

    pub fn get(conn: &Connection, user_id: &str) -> Result<Option<UserProfile>, StoreError> {
        Self::query_one(conn, "id", user_id)
    }

    pub fn find_by_email(conn: &Connection, email: &str) -> Result<Option<UserProfile>, StoreError> {
        Self::query_one(conn, "email", email)
    }

    fn query_one(
        conn: &Connection,
        column: &'static str,
        value: &str,
    ) -> Result<Option<UserProfile>, StoreError> {
        let sql = format!(
            "SELECT id, email, first_name, last_name, birth_year, gender, created_at, updated_at
             FROM users WHERE {} = ?1",
            column
        );
        let row = conn
            .query_row(&sql, params![value], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, i32>(4)?,
                    row.get::<_, String>(5)?,
                    row.get::<_, String>(6)?,
                    row.get::<_, String>(7)?,
                ))
            })
            .optional()?;

        match row {
            None => Ok(None),
            Some((id, email, first_name, last_name, birth_year, gender, created_at, updated_at)) => {
                let gender = Gender::from_str(&gender).map_err(|_| StoreError::InvalidRow {
                    column: "gender",
                    value: gender.clone(),
                })?;
                Ok(Some(UserProfile {
                    id,
                    email,
                    first_name,
                    last_name,
                    birth_year,
                    gender,
                    created_at: parse_timestamp(&created_at),
                    updated_at: parse_timestamp(&updated_at),
                }))
            }
        }
    }
}
