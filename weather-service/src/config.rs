use std::env;
use std::time::Duration;

use crate::cache::{DEFAULT_CAPACITY, DEFAULT_TTL};
use crate::poller::DEFAULT_REFRESH_INTERVAL;

pub struct Config {
    pub port: u16,
    pub api_key: String,
    pub api_url: String,
    pub polling_enabled: bool,
    pub cache_ttl_seconds: u64,
    pub cache_capacity: usize,
    pub refresh_interval_seconds: u64,
    pub upstream_timeout_seconds: u64,
    pub log_json: bool,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3002),
            api_key: env::var("WEATHER_API_KEY").unwrap_or_default(),
            api_url: env::var("WEATHER_API_URL").unwrap_or_else(|_| {
                "https://api.openweathermap.org/data/2.5/weather?q={city}&appid={api_key}&units=metric"
                    .to_string()
            }),
            polling_enabled: env::var("WEATHER_POLLING_ENABLED")
                .ok()
                .and_then(|v| parse_flag(&v))
                .unwrap_or(false),
            cache_ttl_seconds: env::var("CACHE_TTL_SECONDS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(DEFAULT_TTL.as_secs()),
            cache_capacity: env::var("CACHE_CAPACITY")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|s| *s > 0)
                .unwrap_or(DEFAULT_CAPACITY),
            refresh_interval_seconds: env::var("REFRESH_INTERVAL_SECONDS")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|s| *s > 0)
                .unwrap_or(DEFAULT_REFRESH_INTERVAL.as_secs()),
            upstream_timeout_seconds: env::var("UPSTREAM_TIMEOUT_SECONDS")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|s| *s > 0)
                .unwrap_or(5),
            log_json: env::var("LOG_FORMAT")
                .map(|f| f.eq_ignore_ascii_case("json"))
                .unwrap_or(false),
        }
    }

    pub fn cache_ttl(&self) -> Duration {
        Duration::from_secs(self.cache_ttl_seconds)
    }

    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_interval_seconds)
    }

    pub fn upstream_timeout(&self) -> Duration {
        Duration::from_secs(self.upstream_timeout_seconds)
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
