//! Weather collection services: the OpenWeatherMap client, SQLite
//! storage for observations and the batch orchestrator tying them
//! together.

pub mod collector;
pub mod record;
pub mod store;
pub mod weather;

pub use collector::{BatchFailure, BatchReport, Collector};
pub use record::{WeatherRecord, TIMESTAMP_FORMAT};
pub use store::WeatherStore;
pub use weather::OpenWeatherClient;
