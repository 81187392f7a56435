#![allow(dead_code)]

use common::errors::AppError;
use common::models::{Condition, WeatherSnapshot};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicUsize, Ordering};
use weather_service::api_client::WeatherFetcher;
use weather_service::cache::WeatherCache;

pub fn snapshot(city: &str, dt: i64) -> WeatherSnapshot {
    WeatherSnapshot {
        name: city.to_string(),
        weather: vec![Condition {
            main: "Clouds".to_string(),
            description: "overcast clouds".to_string(),
        }],
        dt,
        ..Default::default()
    }
}

/// In-memory provider that counts calls and can be told to fail for a city.
#[derive(Default)]
pub struct FakeFetcher {
    calls: AtomicUsize,
    per_city: Mutex<HashMap<String, usize>>,
    failing: Mutex<HashSet<String>>,
    insert_during_fetch: Mutex<Option<(Arc<WeatherCache>, String)>>,
}

impl FakeFetcher {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn calls_for(&self, city: &str) -> usize {
        self.per_city
            .lock()
            .unwrap()
            .get(city)
            .copied()
            .unwrap_or(0)
    }

    /// On the next fetch, stores `city` straight into `cache` before answering.
    pub fn insert_on_next_fetch(&self, cache: Arc<WeatherCache>, city: &str) {
        *self.insert_during_fetch.lock().unwrap() = Some((cache, city.to_string()));
    }

    pub fn fail_for(&self, city: &str) {
        self.failing.lock().unwrap().insert(city.to_string());
    }
}

impl WeatherFetcher for FakeFetcher {
    async fn fetch(&self, city: &str) -> Result<WeatherSnapshot, AppError> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        *self
            .per_city
            .lock()
            .unwrap()
            .entry(city.to_string())
            .or_default() += 1;

        if self.failing.lock().unwrap().contains(city) {
            return Err(AppError::unexpected(format!("simulated failure for {}", city)));
        }

        let pending = self.insert_during_fetch.lock().unwrap().take();
        if let Some((cache, extra)) = pending {
            cache.insert(extra.clone(), snapshot(&extra, 0)).await;
        }

        tokio::task::yield_now().await;
        Ok(snapshot(city, n as i64))
    }
}
