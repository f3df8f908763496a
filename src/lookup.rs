//! Cache-then-fetch weather lookup
//!
//! A lookup consults the cache first and only reaches the upstream provider on
//! a miss. Successful upstream payloads are written back; failures never are.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, error};

use crate::cache::TtlCache;
use crate::provider::{ProviderError, WeatherProvider};

/// Where a lookup result came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// Served from the in-memory cache
    Cache,
    /// Freshly fetched from the upstream API
    Api,
}

/// A weather payload tagged with its provenance
///
/// Serializes to the 200 response body: `{"source": ..., "data": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherLookup {
    pub source: Source,
    pub data: Value,
}

/// Errors that can occur during a lookup
#[derive(Debug, Error)]
pub enum LookupError {
    /// No city was supplied
    #[error("city name is required")]
    MissingCity,

    /// The upstream provider could not be reached or answered badly
    #[error("upstream weather lookup failed: {0}")]
    Upstream(#[from] ProviderError),
}

/// Resolves weather for a city through the cache and the upstream provider
#[derive(Clone)]
pub struct WeatherService {
    cache: Arc<TtlCache<Value>>,
    provider: Arc<dyn WeatherProvider>,
}

impl WeatherService {
    pub fn new(cache: Arc<TtlCache<Value>>, provider: Arc<dyn WeatherProvider>) -> Self {
        Self { cache, provider }
    }

    pub fn cache(&self) -> &Arc<TtlCache<Value>> {
        &self.cache
    }

    /// Look up current weather for `city`
    ///
    /// Makes at most one upstream call and at most one cache write. Concurrent
    /// misses for the same city are not collapsed; each fetches and the last
    /// write wins.
    pub async fn lookup(&self, city: Option<&str>) -> Result<WeatherLookup, LookupError> {
        let city = match city {
            Some(city) if !city.is_empty() => city,
            _ => return Err(LookupError::MissingCity),
        };

        if let Some(data) = self.cache.get(city) {
            debug!(city, "cache hit");
            return Ok(WeatherLookup {
                source: Source::Cache,
                data,
            });
        }

        debug!(city, "cache miss, fetching upstream");
        let data = self.provider.current_weather(city).await.map_err(|e| {
            error!(city, error = %e, "weather provider request failed");
            LookupError::Upstream(e)
        })?;

        self.cache.set(city, data.clone());

        Ok(WeatherLookup {
            source: Source::Api,
            data,
        })
    }
}

impl std::fmt::Debug for WeatherService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WeatherService")
            .field("cache", &self.cache)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ManualClock;
    use async_trait::async_trait;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    const TTL: Duration = Duration::from_secs(300);

    /// Provider stub that counts calls and replays a fixed outcome
    struct StubProvider {
        calls: AtomicUsize,
        fail: bool,
    }

    impl StubProvider {
        fn ok() -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                fail: false,
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                calls: AtomicUsize::new(0),
                fail: true,
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl WeatherProvider for StubProvider {
        async fn current_weather(&self, city: &str) -> Result<Value, ProviderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(ProviderError::Status {
                    status: reqwest::StatusCode::SERVICE_UNAVAILABLE,
                    body: "down".to_string(),
                });
            }
            Ok(json!({ "name": city, "main": { "temp": 18 } }))
        }
    }

    fn create_service(provider: Arc<StubProvider>) -> (WeatherService, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::default());
        let cache = Arc::new(TtlCache::with_clock(TTL, clock.clone()));
        (WeatherService::new(cache, provider), clock)
    }

    #[tokio::test]
    async fn test_first_lookup_hits_api_then_cache() {
        let provider = StubProvider::ok();
        let (service, _clock) = create_service(provider.clone());

        let first = service.lookup(Some("Seoul")).await.expect("first lookup");
        assert_eq!(first.source, Source::Api);
        assert_eq!(first.data["main"]["temp"], 18);
        assert_eq!(provider.calls(), 1);

        let second = service.lookup(Some("Seoul")).await.expect("second lookup");
        assert_eq!(second.source, Source::Cache);
        assert_eq!(second.data, first.data);
        assert_eq!(provider.calls(), 1, "cache hit must not call upstream");
    }

    #[tokio::test]
    async fn test_missing_city_is_rejected_without_upstream_call() {
        let provider = StubProvider::ok();
        let (service, _clock) = create_service(provider.clone());

        let missing = service.lookup(None).await;
        let empty = service.lookup(Some("")).await;

        assert!(matches!(missing, Err(LookupError::MissingCity)));
        assert!(matches!(empty, Err(LookupError::MissingCity)));
        assert_eq!(provider.calls(), 0);
        assert!(service.cache().is_empty());
    }

    #[tokio::test]
    async fn test_expired_entry_is_refetched() {
        let provider = StubProvider::ok();
        let (service, clock) = create_service(provider.clone());

        service.lookup(Some("Seoul")).await.expect("first lookup");
        clock.advance(chrono::Duration::seconds(300));

        let again = service.lookup(Some("Seoul")).await.expect("lookup after ttl");
        assert_eq!(again.source, Source::Api);
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    async fn test_upstream_failure_is_not_cached() {
        let provider = StubProvider::failing();
        let (service, _clock) = create_service(provider.clone());

        let result = service.lookup(Some("Atlantis")).await;

        assert!(matches!(result, Err(LookupError::Upstream(_))));
        assert!(service.cache().is_empty());

        // No negative caching: the next request tries upstream again
        let _ = service.lookup(Some("Atlantis")).await;
        assert_eq!(provider.calls(), 2);
    }

    #[tokio::test]
    async fn test_cities_are_cached_independently() {
        let provider = StubProvider::ok();
        let (service, _clock) = create_service(provider.clone());

        service.lookup(Some("Seoul")).await.expect("Seoul");
        let suwon = service.lookup(Some("suwon")).await.expect("suwon");

        assert_eq!(suwon.source, Source::Api);
        assert_eq!(suwon.data["name"], "suwon");
        assert_eq!(provider.calls(), 2);
        assert_eq!(service.cache().len(), 2);
    }

    #[tokio::test]
    async fn test_concurrent_misses_each_reach_upstream() {
        let provider = StubProvider::ok();
        let (service, _clock) = create_service(provider.clone());

        let (a, b) = tokio::join!(service.lookup(Some("Seoul")), service.lookup(Some("Seoul")));

        assert!(a.is_ok());
        assert!(b.is_ok());
        assert!(provider.calls() >= 1 && provider.calls() <= 2);
        assert_eq!(service.cache().len(), 1);
        assert!(service.cache().get("Seoul").is_some());
    }

    #[test]
    fn test_lookup_serializes_with_lowercase_source() {
        let lookup = WeatherLookup {
            source: Source::Cache,
            data: json!({ "temp": 18 }),
        };

        let value = serde_json::to_value(&lookup).expect("serialize");
        assert_eq!(value, json!({ "source": "cache", "data": { "temp": 18 } }));
    }
}
