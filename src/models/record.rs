use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::PrayerType;

/// One row of the `prayer_stats` table: a user's running missed count for one prayer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrayerRecord {
    pub user_id: String,
    #[serde(rename = "prayer_name")]
    pub prayer_type: PrayerType,
    /// May go below zero when a user makes up more than they recorded.
    pub skipped_count: i64,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
}

impl PrayerRecord {
    pub fn new(user_id: &str, prayer_type: PrayerType, skipped_count: i64) -> Self {
        Self {
            user_id: user_id.to_string(),
            prayer_type,
            skipped_count,
            created_at: None,
            updated_at: None,
        }
    }
}
