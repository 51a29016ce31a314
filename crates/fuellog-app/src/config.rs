//! Configuration management for fuel-log
//!
//! Config stored at: ~/.config/fuel-log/config.json

use fuellog_types::{ConfigError, OutputFormat, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Environment variable consulted when no vision API key is configured
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Data directory override
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// Default output format (json, table)
    #[serde(default = "default_output_format")]
    pub output_format: OutputFormat,

    /// Distance unit label (mi, km)
    #[serde(default = "default_distance_unit")]
    pub distance_unit: String,

    /// Volume unit label (gal, L)
    #[serde(default = "default_volume_unit")]
    pub volume_unit: String,

    /// Currency symbol
    #[serde(default = "default_currency")]
    pub currency: String,

    /// API key for the vision model
    #[serde(default)]
    pub vision_api_key: Option<String>,

    /// Vision model name
    #[serde(default = "default_vision_model")]
    pub vision_model: String,

    /// Tag entries with current weather when coordinates are known
    #[serde(default = "default_true")]
    pub weather_enabled: bool,

    /// Report temperatures in Fahrenheit
    #[serde(default = "default_true")]
    pub temperature_fahrenheit: bool,

    /// Timeout for network calls, in seconds
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_output_format() -> OutputFormat {
    OutputFormat::Table
}

fn default_distance_unit() -> String {
    "mi".to_string()
}

fn default_volume_unit() -> String {
    "gal".to_string()
}

fn default_currency() -> String {
    "$".to_string()
}

fn default_vision_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            output_format: default_output_format(),
            distance_unit: default_distance_unit(),
            volume_unit: default_volume_unit(),
            currency: default_currency(),
            vision_api_key: None,
            vision_model: default_vision_model(),
            weather_enabled: true,
            temperature_fahrenheit: true,
            request_timeout_secs: default_timeout_secs(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or(ConfigError::NotFound)?
            .join("fuel-log");
        Ok(config_dir)
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    /// Where the fuel log is stored
    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.data_dir {
            return Ok(dir.clone());
        }

        let data_dir = dirs::data_dir()
            .ok_or(ConfigError::NotFound)?
            .join("fuel-log");
        Ok(data_dir)
    }

    /// Configured API key, falling back to the environment
    pub fn api_key(&self) -> Option<String> {
        self.vision_api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| std::env::var(API_KEY_ENV).ok().filter(|k| !k.trim().is_empty()))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs.max(1))
    }

    /// Economy unit label, e.g. "mi/gal"
    pub fn economy_unit(&self) -> String {
        format!("{}/{}", self.distance_unit, self.volume_unit)
    }

    /// Load config from file, or create default
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)
                .map_err(|e| ConfigError::ParseError(e.to_string()))?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save config to file
    pub fn save(&self) -> Result<()> {
        self.save_to(&Self::config_path()?)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        // Ensure directory exists
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Set a single value by its config key
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let invalid = || ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        };

        match key {
            "data_dir" => self.data_dir = Some(PathBuf::from(value)),
            "output_format" => {
                self.output_format = match value.to_lowercase().as_str() {
                    "table" => OutputFormat::Table,
                    "json" => OutputFormat::Json,
                    _ => return Err(invalid().into()),
                }
            }
            "distance_unit" => self.distance_unit = value.to_string(),
            "volume_unit" => self.volume_unit = value.to_string(),
            "currency" => self.currency = value.to_string(),
            "vision_api_key" => self.vision_api_key = Some(value.to_string()),
            "vision_model" => self.vision_model = value.to_string(),
            "weather_enabled" => self.weather_enabled = value.parse().map_err(|_| invalid())?,
            "temperature_fahrenheit" => {
                self.temperature_fahrenheit = value.parse().map_err(|_| invalid())?
            }
            "request_timeout_secs" => {
                self.request_timeout_secs = value.parse().map_err(|_| invalid())?
            }
            _ => return Err(ConfigError::UnknownKey(key.to_string()).into()),
        }
        Ok(())
    }
}

impl std::fmt::Display for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Fuel Log Configuration")?;
        writeln!(f, "======================")?;
        writeln!(f)?;
        writeln!(
            f,
            "Data dir:       {}",
            self.data_dir()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|_| "(error)".to_string())
        )?;
        writeln!(f, "Output format:  {}", self.output_format)?;
        writeln!(
            f,
            "Units:          {} / {} ({})",
            self.distance_unit, self.volume_unit, self.currency
        )?;
        writeln!(f, "Vision model:   {}", self.vision_model)?;
        writeln!(
            f,
            "Vision API key: {}",
            if self.api_key().is_some() { "(set)" } else { "(not set)" }
        )?;
        writeln!(f, "Weather:        {}", self.weather_enabled)?;
        writeln!(f, "Fahrenheit:     {}", self.temperature_fahrenheit)?;
        writeln!(f, "Timeout:        {}s", self.request_timeout_secs)?;

        if let Ok(path) = Self::config_path() {
            writeln!(f)?;
            writeln!(f, "Config file:    {}", path.display())?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fuellog_types::Error;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempdir().unwrap();
        let config = Config::load_from(&dir.path().join("config.json")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"distance_unit": "km", "volume_unit": "L"}"#).unwrap();
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.economy_unit(), "km/L");
        assert_eq!(config.request_timeout_secs, 30);
        assert!(config.weather_enabled);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.json");
        let mut config = Config::default();
        config.set("output_format", "json").unwrap();
        config.set("weather_enabled", "false").unwrap();
        config.save_to(&path).unwrap();
        assert_eq!(Config::load_from(&path).unwrap(), config);
    }

    #[test]
    fn test_set_rejects_bad_input() {
        let mut config = Config::default();
        assert!(matches!(
            config.set("nonsense", "1"),
            Err(Error::Config(ConfigError::UnknownKey(_)))
        ));
        assert!(matches!(
            config.set("request_timeout_secs", "soon"),
            Err(Error::Config(ConfigError::InvalidValue { .. }))
        ));
    }

    #[test]
    fn test_garbled_file_is_parse_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{").unwrap();
        assert!(matches!(
            Config::load_from(&path),
            Err(Error::Config(ConfigError::ParseError(_)))
        ));
    }
}
