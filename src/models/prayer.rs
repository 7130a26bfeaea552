use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;

use crate::error::LedgerError;

/// The six obligatory daily prayers tracked by the ledger, in display order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PrayerType {
    Fajr,
    Dhuhr,
    Asr,
    Maghrib,
    Isha,
    Witr,
}

impl PrayerType {
    pub fn all() -> [PrayerType; 6] {
        [
            PrayerType::Fajr,
            PrayerType::Dhuhr,
            PrayerType::Asr,
            PrayerType::Maghrib,
            PrayerType::Isha,
            PrayerType::Witr,
        ]
    }

    /// Key stored in the `prayer_name` column and sent to the increment procedure.
    pub fn as_str(&self) -> &'static str {
        match self {
            PrayerType::Fajr => "Багымдат",
            PrayerType::Dhuhr => "Бешим",
            PrayerType::Asr => "Аср",
            PrayerType::Maghrib => "Шам",
            PrayerType::Isha => "Куптан",
            PrayerType::Witr => "Витр Важиб",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PrayerType::Fajr => "Fajr",
            PrayerType::Dhuhr => "Dhuhr",
            PrayerType::Asr => "Asr",
            PrayerType::Maghrib => "Maghrib",
            PrayerType::Isha => "Isha",
            PrayerType::Witr => "Witr",
        }
    }

    pub fn rakats(&self) -> u8 {
        match self {
            PrayerType::Fajr => 2,
            PrayerType::Dhuhr => 4,
            PrayerType::Asr => 4,
            PrayerType::Maghrib => 3,
            PrayerType::Isha => 4,
            PrayerType::Witr => 3,
        }
    }
}

impl std::fmt::Display for PrayerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for PrayerType {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim();
        if let Some(pt) = PrayerType::all().into_iter().find(|pt| pt.as_str() == key) {
            return Ok(pt);
        }
        match key.to_lowercase().as_str() {
            "fajr" | "fadjr" | "subh" | "багымдат" => Ok(PrayerType::Fajr),
            "dhuhr" | "zuhr" | "dhuhur" | "zohr" | "бешим" => Ok(PrayerType::Dhuhr),
            "asr" | "аср" => Ok(PrayerType::Asr),
            "maghrib" | "шам" => Ok(PrayerType::Maghrib),
            "isha" | "куптан" => Ok(PrayerType::Isha),
            "witr" | "vitr" | "witr-wajib" | "витр важиб" => Ok(PrayerType::Witr),
            _ => Err(LedgerError::InvalidPrayerType(s.to_string())),
        }
    }
}

// Rows carry the stored key, not the enum name.
impl Serialize for PrayerType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for PrayerType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        PrayerType::from_str(&s).map_err(serde::de::Error::custom)
    }
}
