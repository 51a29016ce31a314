//! Current weather lookup for tagging fill-ups
//!
//! Uses the Open-Meteo forecast endpoint, which needs no API key.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;
use ureq::Agent;

use fuellog_types::{Error, Result};

const OPEN_METEO_URL: &str = "https://api.open-meteo.com/v1/forecast";

/// Conditions at a point at the time of the request
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub temperature: f64,
    /// WMO weather interpretation code
    pub code: i32,
}

#[derive(Debug, Deserialize)]
struct ForecastResponse {
    current_weather: CurrentWeather,
}

#[derive(Debug, Deserialize)]
struct CurrentWeather {
    temperature: f64,
    weathercode: i32,
}

/// Anything that can report current conditions at a coordinate
pub trait WeatherSource {
    fn current(&self, latitude: f64, longitude: f64) -> Result<WeatherSnapshot>;
}

pub struct WeatherClient {
    agent: Agent,
    fahrenheit: bool,
}

impl WeatherClient {
    pub fn new(timeout: Duration) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(timeout))
            .build()
            .into();
        Self {
            agent,
            fahrenheit: false,
        }
    }

    /// Report temperatures in Fahrenheit instead of Celsius
    pub fn with_fahrenheit(mut self, fahrenheit: bool) -> Self {
        self.fahrenheit = fahrenheit;
        self
    }
}

impl WeatherSource for WeatherClient {
    /// Blocking request for the current conditions at a coordinate
    fn current(&self, latitude: f64, longitude: f64) -> Result<WeatherSnapshot> {
        validate_coordinates(latitude, longitude)?;
        debug!(latitude, longitude, "requesting current weather");

        let unit = if self.fahrenheit { "fahrenheit" } else { "celsius" };
        let mut response = match self
            .agent
            .get(OPEN_METEO_URL)
            .query("latitude", latitude.to_string())
            .query("longitude", longitude.to_string())
            .query("current_weather", "true")
            .query("temperature_unit", unit)
            .call()
        {
            Ok(resp) => resp,
            Err(ureq::Error::StatusCode(status)) => {
                return Err(Error::Weather(format!("weather service returned status {}", status)));
            }
            Err(e) => return Err(Error::Weather(format!("network error: {}", e))),
        };

        let forecast: ForecastResponse = response
            .body_mut()
            .read_json()
            .map_err(|e| Error::Weather(format!("failed to parse response: {}", e)))?;

        Ok(WeatherSnapshot {
            temperature: forecast.current_weather.temperature,
            code: forecast.current_weather.weathercode,
        })
    }
}

fn validate_coordinates(latitude: f64, longitude: f64) -> Result<()> {
    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        return Err(Error::Weather(format!(
            "coordinates out of range: {}, {}",
            latitude, longitude
        )));
    }
    Ok(())
}

/// Short label for a WMO weather code
pub fn weather_description(code: i32) -> &'static str {
    match code {
        0 => "Clear sky",
        1 => "Mainly clear",
        2 => "Partly cloudy",
        3 => "Overcast",
        45 | 48 => "Fog",
        51 | 53 | 55 => "Drizzle",
        56 | 57 => "Freezing drizzle",
        61 | 63 | 65 => "Rain",
        66 | 67 => "Freezing rain",
        71 | 73 | 75 => "Snow",
        77 => "Snow grains",
        80..=82 => "Rain showers",
        85 | 86 => "Snow showers",
        95 => "Thunderstorm",
        96 | 99 => "Thunderstorm with hail",
        _ => "Unknown",
    }
}
