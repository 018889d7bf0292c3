//! OpenWeatherMap current-weather client.
//! One GET per city, bounded by a request timeout, no retry.

use crate::record::WeatherRecord;
use chrono::Local;
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use weatherlog_core::FetchError;

const OPENWEATHER_URL: &str = "https://api.openweathermap.org/data/2.5/weather";
const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Subset of the current-weather response we persist.
/// See: https://openweathermap.org/current#fields_json
#[derive(Debug, Deserialize)]
struct WeatherResponse {
    main: MainReadings,
    #[serde(default)]
    weather: Vec<Condition>,
    wind: Wind,
}

#[derive(Debug, Deserialize)]
struct MainReadings {
    temp: f64,
    feels_like: f64,
    humidity: u8,
}

#[derive(Debug, Deserialize)]
struct Condition {
    description: String,
}

#[derive(Debug, Deserialize)]
struct Wind {
    speed: f64,
}

/// Client for the OpenWeatherMap current-weather endpoint.
#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    base_url: String,
    client: Arc<Client>,
    api_key: String,
    country: String,
}

impl OpenWeatherClient {
    /// Create a client against the production OpenWeatherMap endpoint.
    pub fn new(
        api_key: impl Into<String>,
        country: impl Into<String>,
    ) -> Result<Self, FetchError> {
        Self::with_endpoint(
            api_key,
            country,
            OPENWEATHER_URL,
            Duration::from_secs(REQUEST_TIMEOUT_SECS),
        )
    }

    /// Create a client against a custom endpoint with a custom request
    /// timeout. Used by tests and proxy setups.
    pub fn with_endpoint(
        api_key: impl Into<String>,
        country: impl Into<String>,
        base_url: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Client(e.to_string()))?;

        Ok(Self {
            base_url: base_url.into(),
            client: Arc::new(client),
            api_key: api_key.into(),
            country: country.into(),
        })
    }

    /// Fetch the current weather for one city.
    ///
    /// `collected_at` is stamped only after the response has been
    /// fully extracted, so a partially-populated record can never
    /// escape this function.
    pub async fn fetch(&self, city: &str) -> Result<WeatherRecord, FetchError> {
        let query_city = format!("{},{}", city, self.country);

        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("q", query_city.as_str()),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Api {
                status: status.as_u16(),
            });
        }

        let body: WeatherResponse = response.json().await?;

        let condition = body
            .weather
            .first()
            .ok_or(FetchError::MissingField("weather"))?;

        Ok(WeatherRecord {
            city: city.to_string(),
            temperature: body.main.temp,
            feels_like: body.main.feels_like,
            humidity: body.main.humidity,
            description: condition.description.clone(),
            wind_speed: body.wind.speed,
            collected_at: Local::now().naive_local(),
        })
    }
}
