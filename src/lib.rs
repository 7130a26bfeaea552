//! Missed-prayer (qaza) ledger: per-user counts for the six daily prayers,
//! kept in a hosted backend or a local SQLite file.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod ledger;
pub mod models;
pub mod store;
pub mod utils;

pub use error::{LedgerError, ProfileError, StoreError};
pub use ledger::PrayerLedger;
pub use models::{AggregateStats, LedgerSnapshot, PrayerRecord, PrayerType};
pub use store::{PrayerStore, ProfileStore, RestStore, SqliteStore};
