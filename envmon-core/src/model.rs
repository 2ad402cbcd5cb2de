use serde::{Deserialize, Serialize};

/// One reading of current conditions at the monitored location.
///
/// A snapshot is only ever built from a fully decoded response, so every
/// field is present or there is no snapshot at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    pub latitude: f64,
    pub longitude: f64,
    /// Degrees Celsius.
    pub temperature: f64,
    /// Kilometres per hour.
    pub windspeed: f64,
    /// Degrees, 0–360.
    pub winddirection: f64,
    pub weathercode: i32,
    /// Observation time as delivered by the API (ISO-8601, no offset).
    pub time: String,
    /// Metres above sea level.
    pub elevation: f64,
}

#[cfg(test)]
pub(crate) fn sample_snapshot() -> WeatherSnapshot {
    WeatherSnapshot {
        latitude: -25.75,
        longitude: 28.19,
        temperature: 22.5,
        windspeed: 10.2,
        winddirection: 180.0,
        weathercode: 0,
        time: "2024-01-01T12:00:00".to_string(),
        elevation: 1339.0,
    }
}
