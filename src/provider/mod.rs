//! Upstream weather data providers
//!
//! The lookup path only depends on the [`WeatherProvider`] trait, so tests can
//! swap the real HTTP client for a stub.

mod openweather;

pub use openweather::{OpenWeatherClient, OPENWEATHER_BASE_URL};

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

/// Errors that can occur when fetching weather data upstream
#[derive(Debug, Error)]
pub enum ProviderError {
    /// HTTP request failed (connect, timeout, transport)
    ///
    /// The wrapped error never carries the request URL.
    #[error("HTTP request failed: {0}")]
    RequestFailed(reqwest::Error),

    /// Upstream answered with a non-success status
    #[error("Upstream returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    /// Failed to parse JSON response
    #[error("Failed to parse JSON response: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// Source of current weather for a city
///
/// The returned document is opaque: it is cached and relayed verbatim.
#[async_trait]
pub trait WeatherProvider: Send + Sync {
    async fn current_weather(&self, city: &str) -> Result<Value, ProviderError>;
}
