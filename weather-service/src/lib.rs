//! Cached current-weather lookups by city name.
//!
//! [`service::WeatherService`] answers reads from a bounded, TTL-checked
//! [`cache::WeatherCache`] and falls back to a [`api_client::WeatherFetcher`]
//! on a miss. [`poller::spawn_refresh_loop`] optionally keeps every cached
//! city warm in the background.

pub mod api_client;
pub mod cache;
pub mod config;
pub mod handlers;
pub mod openapi;
pub mod poller;
pub mod service;
