use axum::{
    Router,
    extract::{Path, State},
    response::Json,
    routing::get,
};
use common::errors::AppError;
use common::models::WeatherSnapshot;
use std::sync::Arc;
use tracing::info;

use crate::api_client::OpenWeatherClient;
use crate::service::WeatherService;

#[derive(Clone)]
pub struct AppState {
    pub service: Arc<WeatherService<OpenWeatherClient>>,
}

/// Health and weather routes, without docs or middleware.
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/weather/{city}", get(get_weather))
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service health check")
    )
)]
pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok", "service": "weather-service" }))
}

#[utoipa::path(
    get,
    path = "/api/weather/{city}",
    params(
        ("city" = String, Path, description = "City name")
    ),
    responses(
        (status = 200, description = "Current weather for the city", body = WeatherSnapshot),
        (status = 400, description = "Invalid city or upstream failure"),
        (status = 500, description = "Internal server error")
    ),
    tag = "weather"
)]
pub async fn get_weather(
    State(state): State<AppState>,
    Path(city): Path<String>,
) -> Result<Json<WeatherSnapshot>, AppError> {
    info!(city = %city, "Weather request received");

    let weather = state.service.get_weather(&city).await?;

    Ok(Json(weather))
}
