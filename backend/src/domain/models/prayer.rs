//! Domain model for daily prayer records.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// The fixed set of daily prayer slots. Tahajjud is the only optional one;
/// the other five are mandatory for the daily reward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrayerName {
    Fajar,
    Dhuhr,
    Asr,
    Maghrib,
    Isha,
    Tahajjud,
}

impl PrayerName {
    /// Every slot, in the order records are created each day
    pub const ALL: [PrayerName; 6] = [
        PrayerName::Fajar,
        PrayerName::Dhuhr,
        PrayerName::Asr,
        PrayerName::Maghrib,
        PrayerName::Isha,
        PrayerName::Tahajjud,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PrayerName::Fajar => "Fajar",
            PrayerName::Dhuhr => "Dhuhr",
            PrayerName::Asr => "Asr",
            PrayerName::Maghrib => "Maghrib",
            PrayerName::Isha => "Isha",
            PrayerName::Tahajjud => "Tahajjud",
        }
    }

    /// Parse from string for storage loading
    pub fn from_string(s: &str) -> Result<Self, String> {
        match s {
            "Fajar" => Ok(PrayerName::Fajar),
            "Dhuhr" => Ok(PrayerName::Dhuhr),
            "Asr" => Ok(PrayerName::Asr),
            "Maghrib" => Ok(PrayerName::Maghrib),
            "Isha" => Ok(PrayerName::Isha),
            "Tahajjud" => Ok(PrayerName::Tahajjud),
            _ => Err(format!("Invalid prayer name: {}", s)),
        }
    }

    pub fn is_mandatory(&self) -> bool {
        !matches!(self, PrayerName::Tahajjud)
    }
}

/// One prayer slot for one user on one calendar date. Exactly one record
/// exists per (user, prayer name, date).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrayerRecord {
    pub id: String,
    pub user_id: String,
    pub prayer_name: PrayerName,
    pub date: NaiveDate,
    pub is_completed: bool,
    pub created_at: DateTime<Utc>,
}

impl PrayerRecord {
    /// Prayer IDs are natural keys: unique per user as long as at most one
    /// record exists per (prayer name, date).
    pub fn generate_id(date: NaiveDate, name: PrayerName) -> String {
        format!("prayer::{}::{}", date.format("%Y-%m-%d"), name.as_str().to_lowercase())
    }
}
