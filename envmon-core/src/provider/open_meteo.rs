use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::{WeatherError, WeatherSnapshot};

use super::WeatherProvider;

pub const FORECAST_URL: &str = "https://api.open-meteo.com/v1/forecast";

/// Pretoria, South Africa.
pub const LATITUDE: f64 = -25.75;
pub const LONGITUDE: f64 = 28.19;

#[derive(Debug, Clone)]
pub struct OpenMeteoProvider {
    base_url: String,
    http: Client,
}

impl OpenMeteoProvider {
    pub fn new() -> Self {
        Self::with_base_url(FORECAST_URL)
    }

    /// Point the provider at another forecast endpoint (mirrors, test servers).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self { base_url: base_url.into(), http: Client::new() }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn fetch_current(&self) -> Result<WeatherSnapshot, WeatherError> {
        debug!(url = %self.base_url, "requesting current weather");

        let res = self
            .http
            .get(&self.base_url)
            .query(&[
                ("latitude", LATITUDE.to_string()),
                ("longitude", LONGITUDE.to_string()),
                ("current_weather", "true".to_string()),
            ])
            .send()
            .await?;

        let status = res.status();
        if !status.is_success() {
            warn!(%status, "forecast request failed");
            return Err(WeatherError::Request { status: status.as_u16() });
        }

        let body = res.text().await?;
        let parsed: OmForecastResponse = serde_json::from_str(&body)?;

        Ok(parsed.into())
    }
}

impl Default for OpenMeteoProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Deserialize)]
struct OmCurrentWeather {
    temperature: f64,
    windspeed: f64,
    winddirection: f64,
    weathercode: i32,
    time: String,
}

#[derive(Debug, Deserialize)]
struct OmForecastResponse {
    latitude: f64,
    longitude: f64,
    elevation: f64,
    current_weather: OmCurrentWeather,
}

impl From<OmForecastResponse> for WeatherSnapshot {
    fn from(res: OmForecastResponse) -> Self {
        let current = res.current_weather;
        WeatherSnapshot {
            latitude: res.latitude,
            longitude: res.longitude,
            temperature: current.temperature,
            windspeed: current.windspeed,
            winddirection: current.winddirection,
            weathercode: current.weathercode,
            time: current.time,
            elevation: res.elevation,
        }
    }
}

#[async_trait]
impl WeatherProvider for OpenMeteoProvider {
    async fn fetch(&self) -> Result<WeatherSnapshot, WeatherError> {
        let result = self.fetch_current().await;
        if let Err(err) = &result {
            warn!(error = %err, "error fetching weather data");
        }
        result
    }
}
