// crates/weatherlog-services/src/store.rs

use crate::record::{WeatherRecord, TIMESTAMP_FORMAT};
use chrono::NaiveDateTime;
use rusqlite::{params, Connection};
use std::path::{Path, PathBuf};
use weatherlog_core::StoreError;

/// Local SQLite storage for weather observations.
///
/// Holds only the database path; every operation opens and releases
/// its own connection, so each call is independently transactional
/// and no connection outlives the operation it serves.
#[derive(Debug, Clone)]
pub struct WeatherStore {
    path: PathBuf,
}

impl WeatherStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    fn connect(&self) -> Result<Connection, StoreError> {
        Connection::open(&self.path).map_err(|e| StoreError::Unavailable(e.to_string()))
    }

    /// Create the `weather` table if it doesn't exist yet.
    /// Safe to call any number of times.
    pub fn ensure_schema(&self) -> Result<(), StoreError> {
        let conn = self.connect()?;
        conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS weather (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                city TEXT NOT NULL,
                temperature REAL NOT NULL,
                feels_like REAL NOT NULL,
                humidity INTEGER NOT NULL,
                description TEXT NOT NULL,
                wind_speed REAL NOT NULL,
                collected_at TEXT NOT NULL
            );",
        )?;
        Ok(())
    }

    /// Append one observation. The row is committed before this
    /// returns; the store assigns the surrogate id.
    pub fn insert(&self, record: &WeatherRecord) -> Result<(), StoreError> {
        record.validate()?;

        let conn = self.connect()?;
        conn.execute(
            "INSERT INTO weather (city, temperature, feels_like, humidity,
                                  description, wind_speed, collected_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                record.city,
                record.temperature,
                record.feels_like,
                record.humidity,
                record.description,
                record.wind_speed,
                record.collected_at.format(TIMESTAMP_FORMAT).to_string(),
            ],
        )?;
        Ok(())
    }

    /// Most recent observations, newest first. Ties on `collected_at`
    /// fall back to insertion order, latest id first.
    pub fn fetch_recent(&self, limit: usize) -> Result<Vec<WeatherRecord>, StoreError> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(
            "SELECT city, temperature, feels_like, humidity,
                    description, wind_speed, collected_at
             FROM weather
             ORDER BY collected_at DESC, id DESC
             LIMIT ?1",
        )?;

        let rows = stmt
            .query_map([limit as i64], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, f64>(1)?,
                    row.get::<_, f64>(2)?,
                    row.get::<_, u8>(3)?,
                    row.get::<_, String>(4)?,
                    row.get::<_, f64>(5)?,
                    row.get::<_, String>(6)?,
                ))
            })?
            .collect::<Result<Vec<_>, _>>()?;

        // Timestamps are parsed in a second pass so a corrupt row
        // surfaces as InvalidData instead of a conversion panic.
        rows.into_iter()
            .map(
                |(city, temperature, feels_like, humidity, description, wind_speed, raw)| {
                    let collected_at = NaiveDateTime::parse_from_str(&raw, TIMESTAMP_FORMAT)
                        .map_err(|e| {
                            StoreError::InvalidData(format!("bad collected_at {raw:?}: {e}"))
                        })?;
                    Ok(WeatherRecord {
                        city,
                        temperature,
                        feels_like,
                        humidity,
                        description,
                        wind_speed,
                        collected_at,
                    })
                },
            )
            .collect()
    }

    /// Total number of persisted observations.
    pub fn count(&self) -> Result<u64, StoreError> {
        let conn = self.connect()?;
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM weather", [], |row| row.get(0))?;
        Ok(count as u64)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;
    use chrono::NaiveDate;
    use tempfile::tempdir;

    fn record_at(city: &str, hour: u32) -> WeatherRecord {
        WeatherRecord {
            city: city.to_string(),
            temperature: 15.5,
            feels_like: 14.2,
            humidity: 80,
            description: "light rain".to_string(),
            wind_speed: 5.2,
            collected_at: NaiveDate::from_ymd_opt(2025, 10, 2)
                .unwrap()
                .and_hms_opt(hour, 0, 0)
                .unwrap(),
        }
    }

    fn open_store(dir: &tempfile::TempDir) -> WeatherStore {
        let store = WeatherStore::new(dir.path().join("test.db"));
        store.ensure_schema().unwrap();
        store
    }

    #[test]
    fn test_insert_then_fetch_recent_round_trips() {
        let dir = tempdir().unwrap();
        let store = open_store(&dir);

        let record = record_at("Brussels", 18);
        store.insert(&record).unwrap();

        let recent = store.fetch_recent(1).unwrap();
        assert_eq!(recent.len(), 1);
        assert_eq!(recent[0], record);
    }

    #[test]
    fn test_count_matches_inserts() {
        let dir = tempdir().unwrap();
        let store = open_store(&dir);

        assert_eq!(store.count().unwrap(), 0);
        for hour in [8, 9, 10] {
            store.insert(&record_at("Ghent", hour)).unwrap();
        }
        assert_eq!(store.count().unwrap(), 3);
    }

    #[test]
    fn test_fetch_recent_orders_newest_first_and_respects_limit() {
        let dir = tempdir().unwrap();
        let store = open_store(&dir);

        // Inserted out of chronological order on purpose
        store.insert(&record_at("Antwerp", 8)).unwrap();
        store.insert(&record_at("Bruges", 10)).unwrap();
        store.insert(&record_at("Namur", 9)).unwrap();

        let recent = store.fetch_recent(2).unwrap();
        assert_eq!(recent.len(), 2);
        assert_eq!(recent[0].city, "Bruges");
        assert_eq!(recent[1].city, "Namur");
        assert!(recent[0].collected_at >= recent[1].collected_at);
    }

    #[test]
    fn test_fetch_recent_breaks_timestamp_ties_by_insertion_order() {
        let dir = tempdir().unwrap();
        let store = open_store(&dir);

        store.insert(&record_at("Mons", 12)).unwrap();
        store.insert(&record_at("Wavre", 12)).unwrap();

        let recent = store.fetch_recent(2).unwrap();
        // Same timestamp: the later insert comes first
        assert_eq!(recent[0].city, "Wavre");
        assert_eq!(recent[1].city, "Mons");
    }

    #[test]
    fn test_fetch_recent_with_zero_limit_is_empty() {
        let dir = tempdir().unwrap();
        let store = open_store(&dir);
        store.insert(&record_at("Leuven", 7)).unwrap();

        assert!(store.fetch_recent(0).unwrap().is_empty());
    }

    #[test]
    fn test_fetch_recent_on_empty_store() {
        let dir = tempdir().unwrap();
        let store = open_store(&dir);
        assert!(store.fetch_recent(10).unwrap().is_empty());
    }

    #[test]
    fn test_ensure_schema_is_idempotent() {
        let dir = tempdir().unwrap();
        let store = WeatherStore::new(dir.path().join("test.db"));

        store.ensure_schema().unwrap();
        store.ensure_schema().unwrap();

        store.insert(&record_at("Hasselt", 6)).unwrap();
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn test_invalid_record_never_reaches_storage() {
        let dir = tempdir().unwrap();
        let store = open_store(&dir);

        let record = record_at("", 11);
        let err = store.insert(&record).unwrap_err();
        assert!(matches!(err, StoreError::InvalidRecord { field: "city" }));
        assert_eq!(store.count().unwrap(), 0);
    }

    #[test]
    fn test_unreadable_database_path_is_unavailable() {
        // A directory cannot be opened as a SQLite database file
        let dir = tempdir().unwrap();
        let store = WeatherStore::new(dir.path());

        let err = store.ensure_schema().unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)));
    }
}
