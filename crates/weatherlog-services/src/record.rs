use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use weatherlog_core::StoreError;

/// Textual timestamp layout used in the `weather` table (second
/// precision, local wall clock).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One weather observation for one city at one instant.
///
/// Records are immutable once persisted. The store assigns its own
/// surrogate id on insert; it is never part of this type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherRecord {
    pub city: String,
    /// Degrees Celsius
    pub temperature: f64,
    /// Degrees Celsius
    pub feels_like: f64,
    /// Percentage, 0-100
    pub humidity: u8,
    /// One-line condition string, e.g. "light rain"
    pub description: String,
    /// Metres per second
    pub wind_speed: f64,
    pub collected_at: NaiveDateTime,
}

impl WeatherRecord {
    /// Reject records that must not reach storage.
    ///
    /// A failure here signals a defect upstream: the fetch layer
    /// should never produce an invalid record.
    pub fn validate(&self) -> Result<(), StoreError> {
        if self.city.trim().is_empty() {
            return Err(StoreError::InvalidRecord { field: "city" });
        }
        if self.description.trim().is_empty() {
            return Err(StoreError::InvalidRecord {
                field: "description",
            });
        }
        if !self.temperature.is_finite() {
            return Err(StoreError::InvalidRecord {
                field: "temperature",
            });
        }
        if !self.feels_like.is_finite() {
            return Err(StoreError::InvalidRecord {
                field: "feels_like",
            });
        }
        if self.humidity > 100 {
            return Err(StoreError::InvalidRecord { field: "humidity" });
        }
        if !self.wind_speed.is_finite() || self.wind_speed < 0.0 {
            return Err(StoreError::InvalidRecord {
                field: "wind_speed",
            });
        }
        Ok(())
    }
}
