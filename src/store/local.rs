use async_trait::async_trait;
use log::debug;
use rusqlite::Connection;
use std::path::Path;
use tokio::sync::Mutex;

use super::{PrayerStore, ProfileStore, Result};
use crate::db::{run_migrations, PrayerStatsRepo, UserRepo};
use crate::error::StoreError;
use crate::models::{NewProfile, PrayerRecord, PrayerType, UserProfile};

/// Offline store backed by a SQLite file.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        Self::from_connection(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        run_migrations(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Creates the profile and its six zero records in one transaction, returning the new id.
    pub async fn register(&self, profile: &NewProfile) -> Result<String> {
        let mut conn = self.conn.lock().await;
        let tx = conn.transaction()?;
        let user_id = UserRepo::next_local_id(&tx)?;
        UserRepo::insert(&tx, &user_id, profile)?;
        PrayerStatsRepo::seed(&tx, &user_id)?;
        tx.commit()?;
        debug!("Registered local user {}", user_id);
        Ok(user_id)
    }

    pub async fn find_by_email(&self, email: &str) -> Result<UserProfile> {
        let conn = self.conn.lock().await;
        UserRepo::find_by_email(&conn, email)?.ok_or_else(|| StoreError::NotFound {
            resource: "user",
            identifier: email.to_string(),
        })
    }
}

#[async_trait]
impl PrayerStore for SqliteStore {
    async fn fetch_records(&self, user_id: &str) -> Result<Vec<PrayerRecord>> {
        let conn = self.conn.lock().await;
        PrayerStatsRepo::get_for_user(&conn, user_id)
    }

    async fn increment(&self, user_id: &str, prayer: PrayerType, delta: i64) -> Result<()> {
        let conn = self.conn.lock().await;
        PrayerStatsRepo::increment(&conn, user_id, prayer, delta)
    }
}

#[async_trait]
impl ProfileStore for SqliteStore {
    async fn create_profile(&self, user_id: &str, profile: &NewProfile) -> Result<()> {
        let mut conn = self.conn.lock().await;
        let tx = conn.transaction()?;
        UserRepo::insert(&tx, user_id, profile)?;
        PrayerStatsRepo::seed(&tx, user_id)?;
        tx.commit()?;
        Ok(())
    }

    async fn profile(&self, user_id: &str) -> Result<UserProfile> {
        let conn = self.conn.lock().await;
        UserRepo::get(&conn, user_id)?.ok_or_else(|| StoreError::NotFound {
            resource: "user",
            identifier: user_id.to_string(),
        })
    }
}
