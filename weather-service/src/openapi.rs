use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::handlers;
use common::models::{Condition, SunTimes, Temperature, WeatherSnapshot, Wind};

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::health,
        handlers::get_weather,
    ),
    components(schemas(
        WeatherSnapshot,
        Condition,
        Temperature,
        Wind,
        SunTimes,
    )),
    tags(
        (name = "weather", description = "Cached current weather by city"),
    ),
)]
pub struct ApiDoc;

pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi())
}
