//! Core library for the `envmon` dashboard.
//!
//! This crate defines:
//! - The weather snapshot model and the Open-Meteo client
//! - Weather code descriptions
//! - Grid and tree renderers
//! - The dashboard controller with its auto-refresh timer
//! - Configuration handling
//!
//! It is used by `envmon-cli`, but can also be reused by other front-ends.

pub mod codes;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod model;
pub mod provider;
pub mod refresh;
pub mod view;

pub use codes::describe;
pub use config::Config;
pub use dashboard::{Command, Dashboard, DashboardOptions, DashboardState};
pub use error::WeatherError;
pub use model::WeatherSnapshot;
pub use provider::{OpenMeteoProvider, WeatherProvider};
pub use view::ViewMode;
