//! weathercache library
//!
//! Caching proxy in front of the OpenWeatherMap current-weather API. The binary
//! wires these modules together; integration tests drive them directly.

pub mod cache;
pub mod cli;
pub mod lookup;
pub mod provider;
pub mod server;
