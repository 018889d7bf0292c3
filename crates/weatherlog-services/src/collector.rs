//! Batch orchestration: one fetch-and-store pass over a city list.

use crate::store::WeatherStore;
use crate::weather::OpenWeatherClient;
use weatherlog_core::{FetchError, StoreError};

/// Outcome of one collection batch.
#[derive(Debug)]
pub struct BatchReport {
    /// Number of cities in the batch
    pub attempted: usize,
    /// Cities fetched and persisted successfully
    pub succeeded: usize,
    /// Cities that failed, with the cause, in batch order
    pub failures: Vec<BatchFailure>,
}

/// One city that could not be collected this batch.
#[derive(Debug)]
pub struct BatchFailure {
    pub city: String,
    pub error: FetchError,
}

/// Drives one full collection batch: fetch each configured city and
/// hand successful records to the store.
pub struct Collector {
    client: OpenWeatherClient,
    store: WeatherStore,
}

impl Collector {
    pub fn new(client: OpenWeatherClient, store: WeatherStore) -> Self {
        Self { client, store }
    }

    /// Collect every city in order, one at a time.
    ///
    /// A fetch failure is recorded and skipped; the rest of the batch
    /// continues. A storage failure aborts the batch, since a
    /// non-functioning store makes further collection pointless.
    pub async fn run_batch(&self, cities: &[String]) -> Result<BatchReport, StoreError> {
        self.store.ensure_schema()?;

        let mut report = BatchReport {
            attempted: cities.len(),
            succeeded: 0,
            failures: Vec::new(),
        };

        for city in cities {
            match self.client.fetch(city).await {
                Ok(record) => {
                    self.store.insert(&record)?;
                    tracing::info!(
                        "{}: {:.1}°C, {}",
                        record.city,
                        record.temperature,
                        record.description
                    );
                    report.succeeded += 1;
                }
                Err(error) => {
                    tracing::warn!("failed to collect weather for {}: {}", city, error);
                    report.failures.push(BatchFailure {
                        city: city.clone(),
                        error,
                    });
                }
            }
        }

        Ok(report)
    }
}
