use thiserror::Error;

use crate::models::PrayerType;

/// Failures reported by the ledger to its caller. None of these are swallowed.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The record query could not complete.
    #[error("Could not load prayer stats: {0}")]
    FetchFailed(#[source] StoreError),

    /// The atomic increment failed; nothing changed locally.
    #[error("Could not update prayer count: {0}")]
    UpdateFailed(#[source] StoreError),

    #[error("Unknown prayer '{0}'. Use: fajr, dhuhr, asr, maghrib, isha, witr")]
    InvalidPrayerType(String),

    #[error("Not signed in")]
    MissingUser,
}

/// Errors from a backing store, remote or local.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Backend returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Malformed response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Invalid value '{value}' in column {column}")]
    InvalidRow { column: &'static str, value: String },

    #[error("More than one {0} record returned for the same user")]
    DuplicateRecord(PrayerType),

    #[error("{resource} '{identifier}' not found")]
    NotFound {
        resource: &'static str,
        identifier: String,
    },
}

#[derive(Debug, Error)]
pub enum ProfileError {
    #[error("First and last name are required")]
    MissingName,

    #[error("Invalid email address: {0}")]
    InvalidEmail(String),

    #[error("Birth year {0} is out of range")]
    BirthYearOutOfRange(i32),

    #[error("Unknown gender '{0}'. Use: male, female")]
    InvalidGender(String),

    #[error("Passwords do not match")]
    PasswordMismatch,
}
