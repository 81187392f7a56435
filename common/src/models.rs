use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Current weather observation for a city, as returned by the provider.
///
/// Unknown fields are ignored and missing ones fall back to defaults so that
/// provider-side additions never break decoding.
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, ToSchema)]
#[serde(default)]
pub struct WeatherSnapshot {
    pub name: String,
    pub weather: Vec<Condition>,
    pub main: Temperature,
    pub visibility: i64,
    pub wind: Wind,
    /// Observation time, unix seconds.
    pub dt: i64,
    pub sys: SunTimes,
    /// Shift from UTC in seconds.
    pub timezone: i32,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, ToSchema)]
#[serde(default)]
pub struct Condition {
    pub main: String,
    pub description: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, ToSchema)]
#[serde(default)]
pub struct Temperature {
    pub temp: f64,
    pub feels_like: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, ToSchema)]
#[serde(default)]
pub struct Wind {
    pub speed: f64,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq, ToSchema)]
#[serde(default)]
pub struct SunTimes {
    pub sunrise: i64,
    pub sunset: i64,
}
