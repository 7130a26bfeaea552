//! Ledger behaviour over the local store and a recording fake.

use async_trait::async_trait;
use qaza::error::{LedgerError, StoreError};
use qaza::models::{Gender, NewProfile, PrayerRecord, PrayerType};
use qaza::store::{PrayerStore, ProfileStore, SqliteStore};
use qaza::PrayerLedger;
use std::sync::{Arc, Mutex};

// =============================================================================
// Test Helpers
// =============================================================================

fn new_profile(email: &str) -> NewProfile {
    NewProfile {
        email: email.to_string(),
        first_name: "Yerlan".to_string(),
        last_name: "Bekov".to_string(),
        birth_year: 1988,
        gender: Gender::Male,
    }
}

async fn registered_ledger() -> (PrayerLedger<Arc<SqliteStore>>, String) {
    let store = Arc::new(SqliteStore::open_in_memory().unwrap());
    let user_id = store.register(&new_profile("y@b.kz")).await.unwrap();
    (PrayerLedger::new(store), user_id)
}

/// Records every call and serves whatever rows it was given.
#[derive(Default)]
struct RecordingStore {
    rows: Mutex<Vec<PrayerRecord>>,
    calls: Mutex<Vec<String>>,
    fail_fetch: bool,
}

#[async_trait]
impl PrayerStore for RecordingStore {
    async fn fetch_records(&self, user_id: &str) -> qaza::store::Result<Vec<PrayerRecord>> {
        self.calls.lock().unwrap().push(format!("fetch {}", user_id));
        if self.fail_fetch {
            return Err(StoreError::Api {
                status: 500,
                message: "boom".to_string(),
            });
        }
        Ok(self.rows.lock().unwrap().clone())
    }

    async fn increment(&self, user_id: &str, prayer: PrayerType, delta: i64) -> qaza::store::Result<()> {
        self.calls
            .lock()
            .unwrap()
            .push(format!("increment {} {} {}", user_id, prayer.as_str(), delta));
        let mut rows = self.rows.lock().unwrap();
        match rows.iter_mut().find(|r| r.prayer_type == prayer) {
            Some(row) => row.skipped_count += delta,
            None => rows.push(PrayerRecord::new(user_id, prayer, delta)),
        }
        Ok(())
    }
}

// =============================================================================
// Reads
// =============================================================================

#[tokio::test]
async fn test_fresh_user_has_six_zero_rows() {
    let (ledger, user_id) = registered_ledger().await;
    let snap = ledger.load_stats(Some(&user_id)).await.unwrap();

    assert_eq!(snap.records.len(), 6);
    let order: Vec<PrayerType> = snap.records.iter().map(|r| r.prayer_type).collect();
    assert_eq!(order, PrayerType::all().to_vec());
    assert_eq!(snap.stats.total_skipped, 0);
    assert_eq!(snap.stats.years_skipped, 0.0);
}

#[tokio::test]
async fn test_partial_records_scenario() {
    let store = RecordingStore::default();
    store.rows.lock().unwrap().extend([
        PrayerRecord::new("u", PrayerType::Fajr, 10),
        PrayerRecord::new("u", PrayerType::Dhuhr, 20),
    ]);
    let ledger = PrayerLedger::new(store);

    let snap = ledger.load_stats(Some("u")).await.unwrap();
    assert_eq!(snap.stats.total_skipped, 30);
    assert_eq!(snap.stats.years_skipped, 30.0 / 6.0 / 365.0);
    assert!((snap.stats.years_skipped - 0.01370).abs() < 1e-5);
    assert_eq!(snap.skipped(PrayerType::Maghrib), 0);
}

#[tokio::test]
async fn test_repeated_loads_are_identical() {
    let (ledger, user_id) = registered_ledger().await;
    ledger.increment(&user_id, PrayerType::Isha, 5).await.unwrap();

    let a = ledger.load_stats(Some(&user_id)).await.unwrap();
    let b = ledger.load_stats(Some(&user_id)).await.unwrap();
    assert_eq!(a, b);
}

#[tokio::test]
async fn test_signed_out_load_never_calls_store() {
    let ledger = PrayerLedger::new(RecordingStore::default());
    let snap = ledger.load_stats(None).await.unwrap();

    assert!(snap.records.is_empty());
    assert_eq!(snap.stats.total_skipped, 0);
    assert_eq!(snap.stats.years_skipped, 0.0);
    assert!(ledger.store().calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_store_error_surfaces_as_fetch_failed() {
    let store = RecordingStore {
        fail_fetch: true,
        ..Default::default()
    };
    let ledger = PrayerLedger::new(store);

    match ledger.load_stats(Some("u")).await {
        Err(LedgerError::FetchFailed(StoreError::Api { status, .. })) => assert_eq!(status, 500),
        other => panic!("expected FetchFailed, got {:?}", other),
    }
}

// =============================================================================
// Updates
// =============================================================================

#[tokio::test]
async fn test_increments_compose() {
    let (ledger, user_id) = registered_ledger().await;

    ledger.increment(&user_id, PrayerType::Asr, 7).await.unwrap();
    let split = ledger.increment(&user_id, PrayerType::Asr, -3).await.unwrap();

    let (other, other_id) = registered_ledger().await;
    let single = other.increment(&other_id, PrayerType::Asr, 4).await.unwrap();

    assert_eq!(split.skipped(PrayerType::Asr), single.skipped(PrayerType::Asr));
    assert_eq!(split.skipped(PrayerType::Asr), 4);
}

#[tokio::test]
async fn test_decrement_below_zero() {
    let (ledger, user_id) = registered_ledger().await;
    let snap = ledger.increment_prayer(&user_id, "Бешим", -1).await.unwrap();

    assert_eq!(snap.skipped(PrayerType::Dhuhr), -1);
    assert_eq!(snap.stats.total_skipped, -1);
    assert_eq!(snap.stats.years_skipped, -1.0 / 6.0 / 365.0);
}

#[tokio::test]
async fn test_first_increment_creates_missing_row() {
    let store = Arc::new(SqliteStore::open_in_memory().unwrap());
    let ledger = PrayerLedger::new(store);

    // No signup ran for this user, so there are no rows yet.
    let snap = ledger.increment_prayer("unseeded", "witr", 2).await.unwrap();
    assert_eq!(snap.records.len(), 1);
    assert_eq!(snap.skipped(PrayerType::Witr), 2);
}

#[tokio::test]
async fn test_overflowing_update_is_rejected_and_ledger_still_loads() {
    let (ledger, user_id) = registered_ledger().await;
    ledger.increment(&user_id, PrayerType::Fajr, i64::MAX).await.unwrap();

    let err = ledger.increment(&user_id, PrayerType::Fajr, 1).await.unwrap_err();
    assert!(matches!(err, LedgerError::UpdateFailed(StoreError::Sqlite(_))));

    let snap = ledger.load_stats(Some(&user_id)).await.unwrap();
    assert_eq!(snap.skipped(PrayerType::Fajr), i64::MAX);
}

#[tokio::test]
async fn test_extreme_counts_saturate_total() {
    let (ledger, user_id) = registered_ledger().await;
    ledger.increment(&user_id, PrayerType::Fajr, i64::MAX).await.unwrap();
    let snap = ledger.increment(&user_id, PrayerType::Dhuhr, 1).await.unwrap();

    assert_eq!(snap.skipped(PrayerType::Dhuhr), 1);
    assert_eq!(snap.stats.total_skipped, i64::MAX);
}

#[tokio::test]
async fn test_duplicate_rows_are_fetch_failed() {
    let store = RecordingStore::default();
    store.rows.lock().unwrap().extend([
        PrayerRecord::new("u", PrayerType::Isha, 4),
        PrayerRecord::new("u", PrayerType::Isha, 6),
    ]);
    let ledger = PrayerLedger::new(store);

    let err = ledger.load_stats(Some("u")).await.unwrap_err();
    assert!(matches!(
        err,
        LedgerError::FetchFailed(StoreError::DuplicateRecord(PrayerType::Isha))
    ));
}

#[tokio::test]
async fn test_increment_delegates_then_refetches() {
    let ledger = PrayerLedger::new(RecordingStore::default());
    let snap = ledger.increment_prayer("u", "maghrib", 3).await.unwrap();

    assert_eq!(snap.skipped(PrayerType::Maghrib), 3);
    let calls = ledger.store().calls.lock().unwrap().clone();
    assert_eq!(calls, vec!["increment u Шам 3".to_string(), "fetch u".to_string()]);
}

#[tokio::test]
async fn test_invalid_prayer_makes_no_calls() {
    let ledger = PrayerLedger::new(RecordingStore::default());

    for bad in ["", "tahajjud", "Fajr!", "7"] {
        let err = ledger.increment_prayer("u", bad, 1).await.unwrap_err();
        assert!(matches!(err, LedgerError::InvalidPrayerType(_)), "{:?}", bad);
    }
    assert!(ledger.store().calls.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_refresh_failure_after_update() {
    let store = RecordingStore {
        fail_fetch: true,
        ..Default::default()
    };
    let ledger = PrayerLedger::new(store);

    let err = ledger.increment("u", PrayerType::Fajr, 1).await.unwrap_err();
    assert!(matches!(err, LedgerError::FetchFailed(_)));
    // The update itself went through.
    assert_eq!(ledger.store().rows.lock().unwrap()[0].skipped_count, 1);
}

#[tokio::test]
async fn test_concurrent_increments_are_not_lost() {
    let (ledger, user_id) = registered_ledger().await;
    let ledger = Arc::new(ledger);

    let mut handles = Vec::new();
    for _ in 0..20 {
        let ledger = ledger.clone();
        let user_id = user_id.clone();
        handles.push(tokio::spawn(async move {
            ledger.increment(&user_id, PrayerType::Fajr, 1).await.unwrap();
        }));
    }
    for h in handles {
        h.await.unwrap();
    }

    let snap = ledger.load_stats(Some(&user_id)).await.unwrap();
    assert_eq!(snap.skipped(PrayerType::Fajr), 20);
}

#[tokio::test]
async fn test_profile_is_available_after_register() {
    let store = Arc::new(SqliteStore::open_in_memory().unwrap());
    let user_id = store.register(&new_profile("p@q.kz")).await.unwrap();
    let profile = store.profile(&user_id).await.unwrap();
    assert_eq!(profile.full_name(), "Yerlan Bekov");
    assert_eq!(profile.age_in(2025), 37);
}

#[tokio::test]
async fn test_on_disk_store_persists() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("qaza.db");

    let user_id = {
        let store = SqliteStore::open(&path).unwrap();
        let user_id = store.register(&new_profile("d@d.kz")).await.unwrap();
        PrayerLedger::new(store)
            .increment(&user_id, PrayerType::Isha, 12)
            .await
            .unwrap();
        user_id
    };

    let ledger = PrayerLedger::new(SqliteStore::open(&path).unwrap());
    let snap = ledger.load_stats(Some(&user_id)).await.unwrap();
    assert_eq!(snap.skipped(PrayerType::Isha), 12);
}
