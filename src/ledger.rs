//! Reading and updating a user's missed-prayer ledger.
//!
//! The ledger keeps no state between calls. Every read goes to the store, and
//! every update is a single atomic increment on the store followed by a fresh
//! read, so callers only ever see confirmed server state.

use log::debug;
use std::str::FromStr;

use crate::error::LedgerError;
use crate::models::{LedgerSnapshot, PrayerType};
use crate::store::PrayerStore;

pub type Result<T> = std::result::Result<T, LedgerError>;

pub struct PrayerLedger<S> {
    store: S,
}

impl<S: PrayerStore> PrayerLedger<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Fetches every record for the user and derives totals.
    ///
    /// `None` (or an empty id) means nobody is signed in: the empty snapshot is
    /// returned without touching the store.
    pub async fn load_stats(&self, user_id: Option<&str>) -> Result<LedgerSnapshot> {
        let Some(user_id) = user_id.filter(|id| !id.is_empty()) else {
            return Ok(LedgerSnapshot::empty());
        };

        let records = self
            .store
            .fetch_records(user_id)
            .await
            .map_err(LedgerError::FetchFailed)?;
        let snapshot = LedgerSnapshot::new(records).map_err(LedgerError::FetchFailed)?;
        debug!(
            "Loaded {} records for {} (total {})",
            snapshot.records.len(),
            user_id,
            snapshot.stats.total_skipped
        );
        Ok(snapshot)
    }

    /// Parses `prayer` and applies `delta` to it. See [`PrayerLedger::increment`].
    pub async fn increment_prayer(
        &self,
        user_id: &str,
        prayer: &str,
        delta: i64,
    ) -> Result<LedgerSnapshot> {
        let prayer = PrayerType::from_str(prayer)?;
        self.increment(user_id, prayer, delta).await
    }

    /// Adds `delta` to the user's count for `prayer` and returns the refreshed ledger.
    ///
    /// The count may go negative. If the update fails nothing is retried; if the
    /// refresh after a successful update fails, `FetchFailed` is returned even
    /// though the store already holds the new value.
    pub async fn increment(
        &self,
        user_id: &str,
        prayer: PrayerType,
        delta: i64,
    ) -> Result<LedgerSnapshot> {
        if user_id.is_empty() {
            return Err(LedgerError::MissingUser);
        }

        self.store
            .increment(user_id, prayer, delta)
            .await
            .map_err(LedgerError::UpdateFailed)?;
        debug!("Applied {:+} to {} for {}", delta, prayer, user_id);

        self.load_stats(Some(user_id)).await
    }
}
