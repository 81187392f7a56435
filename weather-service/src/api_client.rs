use common::errors::AppError;
use common::http_client::HttpClient;
use common::models::WeatherSnapshot;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, instrument, warn};

/// Source of fresh weather snapshots. Implementations always hit the
/// provider; they never consult a cache.
pub trait WeatherFetcher: Send + Sync + 'static {
    fn fetch(&self, city: &str) -> impl Future<Output = Result<WeatherSnapshot, AppError>> + Send;
}

impl<T: WeatherFetcher> WeatherFetcher for Arc<T> {
    fn fetch(&self, city: &str) -> impl Future<Output = Result<WeatherSnapshot, AppError>> + Send {
        (**self).fetch(city)
    }
}

/// Client for the OpenWeather "current weather" endpoint.
///
/// `url_template` must contain the `{city}` and `{api_key}` placeholders.
pub struct OpenWeatherClient {
    http_client: HttpClient,
    url_template: String,
    api_key: String,
}

impl OpenWeatherClient {
    pub fn new(url_template: String, api_key: String, timeout: Duration) -> Result<Self, AppError> {
        let http_client = HttpClient::new(timeout)
            .map_err(|e| AppError::unexpected(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http_client,
            url_template,
            api_key,
        })
    }

    fn request_url(&self, city: &str) -> String {
        self.url_template
            .replace("{city}", &urlencoding::encode(city))
            .replace("{api_key}", &self.api_key)
    }
}

impl WeatherFetcher for OpenWeatherClient {
    #[instrument(skip(self), fields(city = %city))]
    async fn fetch(&self, city: &str) -> Result<WeatherSnapshot, AppError> {
        info!(city = %city, "Fetching weather from API");

        let url = self.request_url(city);
        match self.http_client.get_json::<WeatherSnapshot>(&url).await {
            Ok(Some(snapshot)) => {
                info!(city = %city, observed_at = snapshot.dt, "Weather data received");
                Ok(snapshot)
            }
            Ok(None) => {
                warn!(city = %city, "The API returned an empty response");
                Err(AppError::empty_response(city))
            }
            Err(e) => {
                let err = AppError::from_upstream(city, e);
                error!(city = %city, kind = ?err.kind(), error = %err, "Weather fetch failed");
                Err(err)
            }
        }
    }
}
