use crate::error::ConfigError;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Environment variable consulted when the config file carries no key
pub const API_KEY_ENV: &str = "OPENWEATHER_API_KEY";

/// Configuration validation errors
#[derive(Debug, Clone)]
pub struct ConfigValidationError {
    pub field: String,
    pub message: String,
}

impl std::fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Result of config validation
#[derive(Debug, Clone, Default)]
pub struct ValidationResult {
    pub errors: Vec<ConfigValidationError>,
    pub warnings: Vec<ConfigValidationError>,
}

impl ValidationResult {
    /// Returns true if there are no errors (warnings are OK)
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// Add an error
    pub fn add_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Add a warning
    pub fn add_warning(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.warnings.push(ConfigValidationError {
            field: field.into(),
            message: message.into(),
        });
    }

    /// Get a user-friendly message summarizing all errors
    pub fn error_summary(&self) -> String {
        if self.errors.is_empty() {
            return String::new();
        }
        self.errors
            .iter()
            .map(|e| e.to_string())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Cities collected each batch, in reporting order
    #[serde(default = "default_cities")]
    pub cities: Vec<String>,

    /// ISO country code appended to every city query
    #[serde(default = "default_country")]
    pub country: String,

    /// Location of the SQLite database file
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,

    /// OpenWeatherMap API key. Usually left unset here and supplied
    /// via the OPENWEATHER_API_KEY environment variable instead.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

/// Capital city + provincial capital cities
fn default_cities() -> Vec<String> {
    [
        "Antwerp",
        "Bruges",
        "Brussels",
        "Ghent",
        "Hasselt",
        "Leuven",
        "Liège",
        "Luxembourg",
        "Mons",
        "Namur",
        "Wavre",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_country() -> String {
    "BE".to_string()
}

fn default_database_path() -> PathBuf {
    PathBuf::from("weather.db")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            cities: default_cities(),
            country: default_country(),
            database_path: default_database_path(),
            api_key: None,
        }
    }
}

impl Config {
    /// Load configuration from file, creating default if it doesn't exist
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            let config = Self::default();
            config.save()?;
            return Ok(config);
        }

        let contents =
            std::fs::read_to_string(&config_path).context("Failed to read config file")?;

        let config: Config =
            toml::from_str(&contents).map_err(|e| ConfigError::Parse(e.to_string()))?;

        Ok(config)
    }

    /// Load configuration and validate it
    ///
    /// Returns the config along with any validation warnings.
    /// Returns an error if validation fails with critical errors.
    pub fn load_validated() -> Result<(Self, ValidationResult)> {
        let config = Self::load()?;
        let validation = config.validate();

        if !validation.is_valid() {
            return Err(ConfigError::Invalid(validation.error_summary()).into());
        }

        for warning in &validation.warnings {
            tracing::warn!("Config warning: {}", warning);
        }

        Ok((config, validation))
    }

    /// Validate the configuration
    ///
    /// Returns a ValidationResult containing any errors or warnings.
    pub fn validate(&self) -> ValidationResult {
        let mut result = ValidationResult::default();

        if self.cities.is_empty() {
            result.add_error("cities", "City list is empty; nothing to collect");
        }
        for (i, city) in self.cities.iter().enumerate() {
            if city.trim().is_empty() {
                result.add_error(format!("cities[{i}]"), "City name is empty");
            }
        }

        if self.country.trim().is_empty() {
            result.add_error("country", "Country code must not be empty");
        }

        if self.api_key.is_none() && std::env::var(API_KEY_ENV).is_err() {
            result.add_warning(
                "api_key",
                format!("No API key in config or {API_KEY_ENV}; collection will fail"),
            );
        }

        result
    }

    /// Resolve the OpenWeatherMap API key: config value first, then the
    /// OPENWEATHER_API_KEY environment variable.
    pub fn api_key(&self) -> Result<String, ConfigError> {
        resolve_api_key(self.api_key.as_deref(), std::env::var(API_KEY_ENV).ok())
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        // Ensure config directory exists
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(&config_path, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Get the path to the configuration file
    fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .context("Failed to get config directory")?
            .join("weatherlog");

        Ok(config_dir.join("config.toml"))
    }
}

fn resolve_api_key(
    configured: Option<&str>,
    from_env: Option<String>,
) -> Result<String, ConfigError> {
    if let Some(key) = configured {
        if !key.trim().is_empty() {
            return Ok(key.to_string());
        }
    }
    match from_env {
        Some(key) if !key.trim().is_empty() => Ok(key),
        _ => Err(ConfigError::MissingApiKey),
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
    use super::*;

    #[test]
    fn test_valid_default_config() {
        let config = Config::default();
        let result = config.validate();
        // Default config should be valid (only warnings, no errors)
        assert!(
            result.is_valid(),
            "Default config should be valid: {:?}",
            result.errors
        );
        assert_eq!(config.cities.len(), 11);
        assert_eq!(config.country, "BE");
    }

    #[test]
    fn test_empty_city_list_is_an_error() {
        let config = Config {
            cities: Vec::new(),
            ..Config::default()
        };
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.field == "cities"));
    }

    #[test]
    fn test_blank_city_name_is_an_error() {
        let mut config = Config::default();
        config.cities[2] = "   ".to_string();
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.field == "cities[2]"));
    }

    #[test]
    fn test_empty_country_is_an_error() {
        let config = Config {
            country: String::new(),
            ..Config::default()
        };
        let result = config.validate();
        assert!(!result.is_valid());
        assert!(result.errors.iter().any(|e| e.field == "country"));
    }

    #[test]
    fn test_api_key_prefers_config_over_env() {
        let key = resolve_api_key(Some("from-config"), Some("from-env".to_string())).unwrap();
        assert_eq!(key, "from-config");
    }

    #[test]
    fn test_api_key_falls_back_to_env() {
        let key = resolve_api_key(None, Some("from-env".to_string())).unwrap();
        assert_eq!(key, "from-env");
    }

    #[test]
    fn test_missing_api_key_everywhere() {
        let err = resolve_api_key(None, None).unwrap_err();
        assert!(matches!(err, ConfigError::MissingApiKey));
    }

    #[test]
    fn test_blank_config_key_falls_through_to_env() {
        let key = resolve_api_key(Some(""), Some("from-env".to_string())).unwrap();
        assert_eq!(key, "from-env");
    }

    #[test]
    fn test_validation_result_error_summary() {
        let mut result = ValidationResult::default();
        result.add_error("field1", "error1");
        result.add_error("field2", "error2");
        let summary = result.error_summary();
        assert!(summary.contains("field1"));
        assert!(summary.contains("field2"));
    }

    #[test]
    fn test_config_round_trips_through_toml() {
        let config = Config::default();
        let serialized = toml::to_string_pretty(&config).unwrap();
        let parsed: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(parsed.cities, config.cities);
        assert_eq!(parsed.database_path, config.database_path);
    }
}
