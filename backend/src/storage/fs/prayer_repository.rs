//! File-based prayer record repository using per-user CSV files.
//!
//! Prayer records are flat rows, one per (prayer name, date), stored in
//! `{user_directory}/prayers.csv`.
//!
//! ## CSV Format
//!
//! ```csv
//! id,user_id,prayer_name,date,is_completed,created_at
//! prayer::2024-01-15::fajar,user::1,Fajar,2024-01-15,true,2024-01-15T05:30:00Z
//! prayer::2024-01-15::dhuhr,user::1,Dhuhr,2024-01-15,false,2024-01-15T05:30:00Z
//! ```

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use csv::{Reader, Writer};
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::fs::{File, OpenOptions};
use std::io::BufReader;
use std::path::PathBuf;

use super::connection::FsConnection;
use super::user_repository::UserRepository;
use crate::domain::models::prayer::{PrayerName, PrayerRecord};
use crate::storage::traits::PrayerStorage;

/// CSV record structure for prayers
#[derive(Debug, Clone, Serialize, Deserialize)]
struct PrayerCsvRecord {
    id: String,
    user_id: String,
    prayer_name: String,
    date: String,
    is_completed: bool,
    created_at: String,
}

impl From<&PrayerRecord> for PrayerCsvRecord {
    fn from(record: &PrayerRecord) -> Self {
        PrayerCsvRecord {
            id: record.id.clone(),
            user_id: record.user_id.clone(),
            prayer_name: record.prayer_name.as_str().to_string(),
            date: record.date.format("%Y-%m-%d").to_string(),
            is_completed: record.is_completed,
            created_at: record.created_at.to_rfc3339(),
        }
    }
}

impl TryFrom<PrayerCsvRecord> for PrayerRecord {
    type Error = anyhow::Error;

    fn try_from(record: PrayerCsvRecord) -> Result<Self> {
        Ok(PrayerRecord {
            id: record.id,
            user_id: record.user_id,
            prayer_name: PrayerName::from_string(&record.prayer_name)
                .map_err(|e| anyhow::anyhow!("Failed to parse prayer name: {}", e))?,
            date: NaiveDate::parse_from_str(&record.date, "%Y-%m-%d")
                .map_err(|e| anyhow::anyhow!("Failed to parse prayer date: {}", e))?,
            is_completed: record.is_completed,
            created_at: DateTime::parse_from_rfc3339(&record.created_at)
                .map_err(|e| anyhow::anyhow!("Failed to parse created_at: {}", e))?
                .with_timezone(&Utc),
        })
    }
}

#[derive(Clone)]
pub struct PrayerRepository {
    connection: FsConnection,
    user_repository: UserRepository,
}

impl PrayerRepository {
    pub fn new(connection: FsConnection) -> Self {
        let user_repository = UserRepository::new(connection.clone());
        Self {
            connection,
            user_repository,
        }
    }

    fn prayers_path(&self, directory_name: &str) -> PathBuf {
        self.connection.user_directory(directory_name).join("prayers.csv")
    }

    fn user_directory(&self, user_id: &str) -> Result<String> {
        self.user_repository
            .find_user_directory(user_id)?
            .ok_or_else(|| anyhow::anyhow!("No data directory for user: {}", user_id))
    }

    fn ensure_prayers_file_exists(&self, directory_name: &str) -> Result<()> {
        let user_dir = self.connection.user_directory(directory_name);
        if !user_dir.exists() {
            std::fs::create_dir_all(&user_dir)?;
        }

        let path = self.prayers_path(directory_name);
        if !path.exists() {
            let header = "id,user_id,prayer_name,date,is_completed,created_at\n";
            std::fs::write(&path, header)?;
            debug!("Created prayers CSV file: {:?}", path);
        }
        Ok(())
    }

    fn read_records(&self, directory_name: &str) -> Result<Vec<PrayerRecord>> {
        self.ensure_prayers_file_exists(directory_name)?;

        let file = File::open(self.prayers_path(directory_name))?;
        let mut csv_reader = Reader::from_reader(BufReader::new(file));

        let mut records = Vec::new();
        for result in csv_reader.deserialize::<PrayerCsvRecord>() {
            let csv_record = result?;
            match PrayerRecord::try_from(csv_record) {
                Ok(record) => records.push(record),
                Err(e) => warn!("Failed to parse prayer record: {}. Skipping.", e),
            }
        }
        Ok(records)
    }

    /// Rewrite the whole file (temp file + rename)
    fn write_records(&self, directory_name: &str, records: &[PrayerRecord]) -> Result<()> {
        let path = self.prayers_path(directory_name);
        let temp_path = path.with_extension("csv.tmp");

        {
            let mut csv_writer = Writer::from_writer(File::create(&temp_path)?);
            for record in records {
                csv_writer.serialize(PrayerCsvRecord::from(record))?;
            }
            csv_writer.flush()?;
        }

        std::fs::rename(&temp_path, &path)?;
        debug!("Wrote {} prayer records to {:?}", records.len(), path);
        Ok(())
    }
}

impl PrayerStorage for PrayerRepository {
    fn store_prayers(&self, user_id: &str, records: &[PrayerRecord]) -> Result<()> {
        let directory_name = self.user_directory(user_id)?;
        self.ensure_prayers_file_exists(&directory_name)?;

        let file = OpenOptions::new()
            .append(true)
            .open(self.prayers_path(&directory_name))?;

        // No headers when appending to an existing file
        let mut csv_writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        for record in records {
            csv_writer.serialize(PrayerCsvRecord::from(record))?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    fn list_prayers_for_date(&self, user_id: &str, date: NaiveDate) -> Result<Vec<PrayerRecord>> {
        let directory_name = self.user_directory(user_id)?;
        Ok(self
            .read_records(&directory_name)?
            .into_iter()
            .filter(|record| record.date == date)
            .collect())
    }

    fn get_prayer(&self, user_id: &str, prayer_id: &str) -> Result<Option<PrayerRecord>> {
        let directory_name = self.user_directory(user_id)?;
        Ok(self
            .read_records(&directory_name)?
            .into_iter()
            .find(|record| record.id == prayer_id))
    }

    fn update_prayer(&self, user_id: &str, record: &PrayerRecord) -> Result<()> {
        let directory_name = self.user_directory(user_id)?;
        let mut records = self.read_records(&directory_name)?;
        let slot = records
            .iter_mut()
            .find(|existing| existing.id == record.id)
            .ok_or_else(|| anyhow::anyhow!("Prayer record not found: {}", record.id))?;
        *slot = record.clone();
        self.write_records(&directory_name, &records)
    }
}
