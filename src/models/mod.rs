pub mod prayer;
pub mod record;
pub mod stats;
pub mod user;

pub use prayer::PrayerType;
pub use record::PrayerRecord;
pub use stats::{AggregateStats, LedgerSnapshot};
pub use user::{Gender, NewProfile, UserProfile};
