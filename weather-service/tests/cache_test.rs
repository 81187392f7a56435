mod support;

use common::errors::ErrorKind;
use std::sync::Arc;
use std::time::Duration;
use support::{FakeFetcher, snapshot};
use weather_service::cache::WeatherCache;
use weather_service::service::WeatherService;

fn service() -> (Arc<FakeFetcher>, WeatherService<Arc<FakeFetcher>>) {
    let fetcher = Arc::new(FakeFetcher::default());
    let cache = Arc::new(WeatherCache::default());
    (fetcher.clone(), WeatherService::new(cache, fetcher))
}

const CITIES: [&str; 11] = [
    "London", "Tokyo", "Paris", "Berlin", "Moscow", "Beijing", "Sydney", "Cairo", "Lima", "Oslo",
    "Rome",
];

#[tokio::test]
async fn blank_city_is_rejected_without_fetching() {
    let (fetcher, service) = service();

    for city in ["", "   ", "\t\n"] {
        let err = service.get_weather(city).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidInput);
        assert!(
            err.to_string().contains(&format!("{:?}", city)),
            "{err} should quote the rejected input"
        );
    }

    assert_eq!(fetcher.calls(), 0);
    assert!(service.cache().is_empty().await);
}

#[tokio::test]
async fn second_read_is_served_from_cache() {
    let (fetcher, service) = service();

    let first = service.get_weather("Paris").await.unwrap();
    assert_eq!(first.name, "Paris");
    assert_eq!(fetcher.calls(), 1);

    let second = service.get_weather("Paris").await.unwrap();
    assert_eq!(second, first);
    assert_eq!(fetcher.calls(), 1);
}

#[tokio::test]
async fn city_names_are_trimmed_and_case_sensitive() {
    let (fetcher, service) = service();

    service.get_weather("  Paris ").await.unwrap();
    assert!(service.cache().contains("Paris").await);

    service.get_weather("Paris").await.unwrap();
    assert_eq!(fetcher.calls(), 1);

    service.get_weather("paris").await.unwrap();
    assert_eq!(fetcher.calls(), 2);
    assert_eq!(service.cache().len().await, 2);
}

#[tokio::test(start_paused = true)]
async fn entries_expire_after_ttl() {
    let (fetcher, service) = service();

    service.get_weather("Berlin").await.unwrap();
    assert_eq!(fetcher.calls(), 1);

    tokio::time::advance(Duration::from_secs(599)).await;
    service.get_weather("Berlin").await.unwrap();
    assert_eq!(fetcher.calls(), 1);

    tokio::time::advance(Duration::from_secs(2)).await;
    let refreshed = service.get_weather("Berlin").await.unwrap();
    assert_eq!(fetcher.calls(), 2);
    assert_eq!(refreshed.dt, 2);
}

#[tokio::test(start_paused = true)]
async fn stale_entry_is_kept_when_refetch_fails() {
    let (fetcher, service) = service();

    service.get_weather("Lima").await.unwrap();
    tokio::time::advance(Duration::from_secs(601)).await;
    fetcher.fail_for("Lima");

    let err = service.get_weather("Lima").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnexpectedError);
    assert!(service.cache().contains("Lima").await);
}

#[tokio::test(start_paused = true)]
async fn full_cache_evicts_oldest_entry() {
    let cache = WeatherCache::default();

    for city in &CITIES[..10] {
        assert_eq!(cache.insert(city.to_string(), snapshot(city, 0)).await, None);
        tokio::time::advance(Duration::from_secs(1)).await;
    }
    assert_eq!(cache.len().await, 10);

    let evicted = cache.insert("Rome".to_string(), snapshot("Rome", 0)).await;
    assert_eq!(evicted.as_deref(), Some("London"));
    assert_eq!(cache.len().await, 10);
    assert!(!cache.contains("London").await);
    for city in &CITIES[1..] {
        assert!(cache.contains(city).await, "{city} should still be cached");
    }
}

#[tokio::test(start_paused = true)]
async fn eviction_follows_fetch_time_not_insertion_order() {
    let (_, service) = service();

    for city in &CITIES[..10] {
        service.get_weather(city).await.unwrap();
        tokio::time::advance(Duration::from_secs(1)).await;
    }

    // Refreshing London makes Tokyo the oldest.
    service.fetch_and_cache("London").await.unwrap();
    tokio::time::advance(Duration::from_secs(1)).await;

    service.get_weather("Rome").await.unwrap();
    assert_eq!(service.cache().len().await, 10);
    assert!(service.cache().contains("London").await);
    assert!(!service.cache().contains("Tokyo").await);
}

#[tokio::test(start_paused = true)]
async fn fetch_for_evicted_city_is_written_back() {
    let (_, service) = service();

    for city in &CITIES {
        service.get_weather(city).await.unwrap();
        tokio::time::advance(Duration::from_secs(1)).await;
    }
    assert!(!service.cache().contains("London").await);

    service.fetch_and_cache("London").await.unwrap();

    assert!(service.cache().contains("London").await);
    assert!(!service.cache().contains("Tokyo").await);
    assert_eq!(service.cache().len().await, service.cache().capacity());
}

#[tokio::test(start_paused = true)]
async fn replacing_an_entry_never_evicts() {
    let cache = WeatherCache::default();

    for city in &CITIES[..10] {
        cache.insert(city.to_string(), snapshot(city, 0)).await;
        tokio::time::advance(Duration::from_secs(1)).await;
    }

    let evicted = cache.insert("Oslo".to_string(), snapshot("Oslo", 1)).await;
    assert_eq!(evicted, None);
    assert_eq!(cache.len().await, 10);
    for city in &CITIES[..10] {
        assert!(cache.contains(city).await);
    }
    assert_eq!(cache.get("Oslo").await.map(|s| s.dt), Some(1));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_misses_fill_cache_exactly() {
    let (fetcher, service) = service();
    let service = Arc::new(service);

    let handles: Vec<_> = CITIES[..10]
        .iter()
        .map(|&city| {
            let service = service.clone();
            tokio::spawn(async move { service.get_weather(city).await })
        })
        .collect();

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    assert_eq!(fetcher.calls(), 10);
    let mut keys = service.cache().keys().await;
    keys.sort();
    let mut expected: Vec<String> = CITIES[..10].iter().map(|c| c.to_string()).collect();
    expected.sort();
    assert_eq!(keys, expected);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_inserts_never_exceed_capacity() {
    let cache = Arc::new(WeatherCache::new(Duration::from_secs(600), 3));

    let handles: Vec<_> = CITIES
        .iter()
        .map(|&city| {
            let cache = cache.clone();
            tokio::spawn(async move {
                cache.insert(city.to_string(), snapshot(city, 0)).await;
                cache.len().await
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.await.unwrap() <= 3);
    }
    assert_eq!(cache.len().await, 3);
}
