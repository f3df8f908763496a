//! Command-line and environment configuration for weathercache
//!
//! Every setting can be given as a flag or through the process environment
//! (a `.env` file is loaded first by the binary). `PORT` and `WEATHER_KEY`
//! are the two the service cannot run without sensible values for.

use std::time::Duration;

use clap::Parser;
use thiserror::Error;

use crate::provider::OPENWEATHER_BASE_URL;

/// Error types for configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The upstream API key is empty
    #[error("WEATHER_KEY must not be empty")]
    MissingApiKey,

    /// A duration setting was zero
    #[error("{0} must be greater than zero")]
    ZeroDuration(&'static str),

    /// A duration setting exceeded the supported maximum
    #[error("{0} must be at most one year (31536000 seconds)")]
    DurationTooLarge(&'static str),
}

/// Upper bound for every duration setting (one year)
pub const MAX_DURATION_SECS: u64 = 365 * 24 * 60 * 60;

/// weathercache - caching proxy for OpenWeatherMap current weather
#[derive(Parser, Debug)]
#[command(name = "weathercache")]
#[command(about = "Caching HTTP proxy for current weather lookups")]
#[command(version)]
pub struct Cli {
    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// OpenWeatherMap API key
    #[arg(long, env = "WEATHER_KEY", hide_env_values = true)]
    pub api_key: String,

    /// Seconds a cached response stays valid
    #[arg(long, env = "CACHE_TTL_SECS", default_value_t = 300)]
    pub cache_ttl_secs: u64,

    /// Seconds between sweeps that drop expired cache entries
    #[arg(long, env = "CACHE_SWEEP_SECS", default_value_t = 150)]
    pub sweep_interval_secs: u64,

    /// Seconds before an upstream request is abandoned
    #[arg(long, env = "UPSTREAM_TIMEOUT_SECS", default_value_t = 10)]
    pub upstream_timeout_secs: u64,

    /// Upstream current-weather endpoint
    #[arg(long, env = "WEATHER_API_URL", default_value = OPENWEATHER_BASE_URL)]
    pub upstream_url: String,

    /// Unit system requested upstream
    #[arg(long, env = "WEATHER_UNITS", default_value = "metric")]
    pub units: String,

    /// Response language requested upstream
    #[arg(long, env = "WEATHER_LANG", default_value = "kr")]
    pub lang: String,
}

/// Validated runtime settings derived from CLI arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub port: u16,
    pub api_key: String,
    pub cache_ttl: Duration,
    pub sweep_interval: Duration,
    pub upstream_timeout: Duration,
    pub upstream_url: String,
    pub units: String,
    pub lang: String,
}

impl ServerConfig {
    /// Creates a ServerConfig from parsed CLI arguments.
    ///
    /// # Returns
    /// * `Ok(ServerConfig)` with durations converted
    /// * `Err(ConfigError)` if the API key is blank or a duration is zero or
    ///   longer than [`MAX_DURATION_SECS`]
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        if cli.api_key.trim().is_empty() {
            return Err(ConfigError::MissingApiKey);
        }

        Ok(ServerConfig {
            port: cli.port,
            api_key: cli.api_key.clone(),
            cache_ttl: non_zero_secs(cli.cache_ttl_secs, "CACHE_TTL_SECS")?,
            sweep_interval: non_zero_secs(cli.sweep_interval_secs, "CACHE_SWEEP_SECS")?,
            upstream_timeout: non_zero_secs(cli.upstream_timeout_secs, "UPSTREAM_TIMEOUT_SECS")?,
            upstream_url: cli.upstream_url.clone(),
            units: cli.units.clone(),
            lang: cli.lang.clone(),
        })
    }
}

/// Converts a seconds setting, rejecting zero and anything past one year
fn non_zero_secs(secs: u64, name: &'static str) -> Result<Duration, ConfigError> {
    if secs == 0 {
        return Err(ConfigError::ZeroDuration(name));
    }
    if secs > MAX_DURATION_SECS {
        return Err(ConfigError::DurationTooLarge(name));
    }

    let duration = Duration::from_secs(secs);
    // Expiry deadlines are computed in chrono; make sure the value converts
    chrono::Duration::from_std(duration).map_err(|_| ConfigError::DurationTooLarge(name))?;
    Ok(duration)
}
