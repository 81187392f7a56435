use common::errors::AppError;
use common::models::WeatherSnapshot;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use crate::api_client::WeatherFetcher;
use crate::cache::WeatherCache;

/// Outcome of one refresh pass over the cached cities.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshSummary {
    pub refreshed: usize,
    pub failed: usize,
}

/// Fill-on-miss front of the weather cache.
pub struct WeatherService<F> {
    cache: Arc<WeatherCache>,
    fetcher: F,
}

impl<F: WeatherFetcher> WeatherService<F> {
    pub fn new(cache: Arc<WeatherCache>, fetcher: F) -> Self {
        Self { cache, fetcher }
    }

    pub fn cache(&self) -> &Arc<WeatherCache> {
        &self.cache
    }

    /// Returns weather for `city`, served from the cache while it is fresh
    /// and fetched from the provider otherwise.
    #[instrument(skip(self))]
    pub async fn get_weather(&self, city: &str) -> Result<WeatherSnapshot, AppError> {
        let raw = city;
        let city = raw.trim();
        if city.is_empty() {
            warn!(city = ?raw, "Incorrect city name transmitted");
            return Err(AppError::invalid_input(format!(
                "The city name cannot be empty or blank: {:?}",
                raw
            )));
        }

        info!(city = %city, "Weather request for a city");

        if let Some(cached) = self.cache.get(city).await {
            info!(city = %city, "Cache hit");
            return Ok(cached);
        }

        self.fetch_and_cache(city).await
    }

    /// Fetches `city` from the provider and stores the result. Always hits
    /// the network, even if a fresh entry exists.
    pub async fn fetch_and_cache(&self, city: &str) -> Result<WeatherSnapshot, AppError> {
        let weather = self.fetcher.fetch(city).await?;

        info!(city = %city, "Data caching for the city");
        self.cache.insert(city.to_string(), weather.clone()).await;

        Ok(weather)
    }

    /// Re-fetches every city cached at the start of the pass. Failures are
    /// logged and skipped.
    #[instrument(skip(self))]
    pub async fn refresh_all(&self) -> RefreshSummary {
        let cities = self.cache.keys().await;
        info!(count = cities.len(), "Automatic update of cached data");

        let mut summary = RefreshSummary::default();
        for city in cities {
            match self.fetch_and_cache(&city).await {
                Ok(_) => summary.refreshed += 1,
                Err(e) => {
                    warn!(city = %city, kind = ?e.kind(), error = %e, "Failed to refresh cached city");
                    summary.failed += 1;
                }
            }
        }

        info!(
            refreshed = summary.refreshed,
            failed = summary.failed,
            "Cache refresh completed"
        );
        summary
    }
}
