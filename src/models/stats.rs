use serde::{Deserialize, Serialize};

use crate::error::StoreError;
use crate::models::{PrayerRecord, PrayerType};

/// Divisor applied to the total before converting to years.
///
/// This is the number of prayer types, not the 20 daily rakats of the catalog.
/// Kept as-is so figures match what users have always been shown.
pub const PRAYERS_PER_DAY_DIVISOR: f64 = 6.0;
pub const DAYS_PER_YEAR: f64 = 365.0;

/// Totals derived from a user's records. Never persisted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateStats {
    pub total_skipped: i64,
    pub years_skipped: f64,
}

impl AggregateStats {
    /// The total saturates at the `i64` bounds instead of overflowing.
    pub fn from_records(records: &[PrayerRecord]) -> Self {
        let total_skipped = records
            .iter()
            .fold(0i64, |acc, r| acc.saturating_add(r.skipped_count));
        Self {
            total_skipped,
            years_skipped: years_for(total_skipped),
        }
    }
}

pub fn years_for(total_skipped: i64) -> f64 {
    total_skipped as f64 / PRAYERS_PER_DAY_DIVISOR / DAYS_PER_YEAR
}

/// A full read of one user's ledger: records in catalog order plus their totals.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub records: Vec<PrayerRecord>,
    pub stats: AggregateStats,
}

impl LedgerSnapshot {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Sorts into catalog order. Two records for the same prayer are rejected,
    /// since the per-prayer rows would no longer add up to the total.
    pub fn new(mut records: Vec<PrayerRecord>) -> Result<Self, StoreError> {
        records.sort_by_key(|r| r.prayer_type);
        if let Some(pair) = records
            .windows(2)
            .find(|w| w[0].prayer_type == w[1].prayer_type)
        {
            return Err(StoreError::DuplicateRecord(pair[0].prayer_type));
        }
        let stats = AggregateStats::from_records(&records);
        Ok(Self { records, stats })
    }

    /// Missed count for one prayer; types without a record count as zero.
    pub fn skipped(&self, prayer: PrayerType) -> i64 {
        self.records
            .iter()
            .find(|r| r.prayer_type == prayer)
            .map(|r| r.skipped_count)
            .unwrap_or(0)
    }

    /// Every catalog prayer with its count, present or not.
    pub fn rows(&self) -> impl Iterator<Item = (PrayerType, i64)> + '_ {
        PrayerType::all().into_iter().map(|p| (p, self.skipped(p)))
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
