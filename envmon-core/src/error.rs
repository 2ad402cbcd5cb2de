//! Errors surfaced by the weather client.

use thiserror::Error;

/// Message shown to the user for any failed refresh.
pub const FETCH_FAILED_MESSAGE: &str = "Failed to fetch weather data. Please try again.";

#[derive(Error, Debug)]
pub enum WeatherError {
    /// The forecast endpoint answered with a non-success status.
    #[error("API request failed: {status}")]
    Request { status: u16 },

    /// Connection or body transfer failed.
    #[error(transparent)]
    Transport(#[from] reqwest::Error),

    #[error("Failed to decode forecast response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl WeatherError {
    /// User-facing message; every failure collapses to the same text.
    pub fn user_message(&self) -> &'static str {
        FETCH_FAILED_MESSAGE
    }

    /// HTTP status for request failures.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Request { status } => Some(*status),
            Self::Transport(err) => err.status().map(|s| s.as_u16()),
            Self::Decode(_) => None,
        }
    }
}
