//! OpenWeatherMap current-weather API client
//!
//! Issues a single GET per call and hands back the response body as untyped
//! JSON. Nothing in the payload is interpreted here.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;

use super::{ProviderError, WeatherProvider};

/// Base URL for the OpenWeatherMap current weather endpoint
pub const OPENWEATHER_BASE_URL: &str = "https://api.openweathermap.org/data/2.5/weather";

/// Default upstream timeout
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for fetching current weather from OpenWeatherMap
#[derive(Clone)]
pub struct OpenWeatherClient {
    client: Client,
    base_url: String,
    api_key: String,
    units: String,
    lang: String,
}

impl OpenWeatherClient {
    /// Create a new client with default settings (metric units, Korean text)
    pub fn new(api_key: impl Into<String>) -> Result<Self, ProviderError> {
        Self::with_timeout(api_key, DEFAULT_TIMEOUT)
    }

    /// Create a new client whose requests give up after `timeout`
    pub fn with_timeout(api_key: impl Into<String>, timeout: Duration) -> Result<Self, ProviderError> {
        let client = Client::builder().timeout(timeout).build().map_err(strip_url)?;
        Ok(Self::with_client(client, api_key))
    }

    /// Create a new client with a custom HTTP client
    pub fn with_client(client: Client, api_key: impl Into<String>) -> Self {
        Self {
            client,
            base_url: OPENWEATHER_BASE_URL.to_string(),
            api_key: api_key.into(),
            units: "metric".to_string(),
            lang: "kr".to_string(),
        }
    }

    /// Point the client at a different endpoint
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Unit system passed upstream (`metric`, `imperial`, `standard`)
    pub fn with_units(mut self, units: impl Into<String>) -> Self {
        self.units = units.into();
        self
    }

    /// Language for human-readable fields in the response
    pub fn with_lang(mut self, lang: impl Into<String>) -> Self {
        self.lang = lang.into();
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn units(&self) -> &str {
        &self.units
    }

    pub fn lang(&self) -> &str {
        &self.lang
    }

    /// Fetch current weather for `city`
    ///
    /// # Returns
    /// * `Ok(Value)` - The upstream JSON document, untouched
    /// * `Err(ProviderError)` - Transport failure, non-2xx status, or a body
    ///   that is not JSON
    pub async fn fetch_current(&self, city: &str) -> Result<Value, ProviderError> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("q", city),
                ("appid", self.api_key.as_str()),
                ("units", self.units.as_str()),
                ("lang", self.lang.as_str()),
            ])
            .send()
            .await
            .map_err(strip_url)?;

        let status = response.status();
        let text = response.text().await.map_err(strip_url)?;

        if !status.is_success() {
            return Err(ProviderError::Status { status, body: text });
        }

        Ok(serde_json::from_str(&text)?)
    }
}

/// Drops the request URL from a transport error; it carries the API key
fn strip_url(e: reqwest::Error) -> ProviderError {
    ProviderError::RequestFailed(e.without_url())
}

#[async_trait]
impl WeatherProvider for OpenWeatherClient {
    async fn current_weather(&self, city: &str) -> Result<Value, ProviderError> {
        self.fetch_current(city).await
    }
}

impl std::fmt::Debug for OpenWeatherClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenWeatherClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"<redacted>")
            .field("units", &self.units)
            .field("lang", &self.lang)
            .finish()
    }
}
