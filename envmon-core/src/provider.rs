use crate::{WeatherError, WeatherSnapshot};
use async_trait::async_trait;
use std::fmt::Debug;

pub mod open_meteo;

pub use open_meteo::OpenMeteoProvider;

/// Source of current conditions for the monitored location.
#[async_trait]
pub trait WeatherProvider: Send + Sync + Debug {
    async fn fetch(&self) -> Result<WeatherSnapshot, WeatherError>;
}
