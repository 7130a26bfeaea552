use async_trait::async_trait;
use std::sync::Arc;

use crate::error::StoreError;
use crate::models::{NewProfile, PrayerRecord, PrayerType, UserProfile};

mod local;
pub use local::*;

mod remote;
pub use remote::*;
pub(crate) use remote::check_status;

pub type Result<T> = std::result::Result<T, StoreError>;

/// Where prayer records live. Implementations own the atomicity of `increment`.
#[async_trait]
pub trait PrayerStore: Send + Sync {
    /// All records for a user, ordered by prayer name.
    async fn fetch_records(&self, user_id: &str) -> Result<Vec<PrayerRecord>>;

    /// Server-side `skipped_count += delta`. Creates the row if it doesn't exist yet.
    /// A result outside the `i64` range is an error and leaves the count unchanged.
    async fn increment(&self, user_id: &str, prayer: PrayerType, delta: i64) -> Result<()>;
}

/// User profiles and the signup procedure that seeds a new user's six records.
#[async_trait]
pub trait ProfileStore: Send + Sync {
    async fn create_profile(&self, user_id: &str, profile: &NewProfile) -> Result<()>;
    async fn profile(&self, user_id: &str) -> Result<UserProfile>;
}

#[async_trait]
impl<T: PrayerStore + ?Sized> PrayerStore for Arc<T> {
    async fn fetch_records(&self, user_id: &str) -> Result<Vec<PrayerRecord>> {
        (**self).fetch_records(user_id).await
    }

    async fn increment(&self, user_id: &str, prayer: PrayerType, delta: i64) -> Result<()> {
        (**self).increment(user_id, prayer, delta).await
    }
}

#[async_trait]
impl<T: ProfileStore + ?Sized> ProfileStore for Arc<T> {
    async fn create_profile(&self, user_id: &str, profile: &NewProfile) -> Result<()> {
        (**self).create_profile(user_id, profile).await
    }

    async fn profile(&self, user_id: &str) -> Result<UserProfile> {
        (**self).profile(user_id).await
    }
}
