use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, instrument, warn};

/// Raw failure talking to an upstream provider, before classification.
#[derive(Error, Debug)]
pub enum UpstreamError {
    #[error("HTTP error: {status} - {body}")]
    Status { status: u16, body: String },

    #[error("Request timed out after {0:?}")]
    Timeout(Duration),

    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("JSON parse error: {0}")]
    Decode(#[from] serde_json::Error),
}

/// HTTP client issuing one bounded GET per call.
pub struct HttpClient {
    client: Client,
    timeout: Duration,
}

impl HttpClient {
    pub fn new(timeout: Duration) -> Result<Self, UpstreamError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self { client, timeout })
    }

    /// Fetch JSON from `url`.
    ///
    /// Returns `Ok(None)` when the provider answers successfully but the body
    /// carries nothing usable (empty, `null` or `{}`).
    #[instrument(skip_all)]
    pub async fn get_json<T>(&self, url: &str) -> Result<Option<T>, UpstreamError>
    where
        T: DeserializeOwned,
    {
        let response = tokio::time::timeout(self.timeout, self.client.get(url).send())
            .await
            .map_err(|_| UpstreamError::Timeout(self.timeout))?
            .map_err(|e| {
                if e.is_timeout() {
                    UpstreamError::Timeout(self.timeout)
                } else {
                    UpstreamError::Transport(e.without_url())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), "Upstream returned an error status");
            return Err(UpstreamError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let text = response.text().await.map_err(|e| {
            if e.is_timeout() {
                UpstreamError::Timeout(self.timeout)
            } else {
                UpstreamError::Transport(e.without_url())
            }
        })?;
        info!(status = status.as_u16(), bytes = text.len(), "Request successful");

        decode_payload(&text)
    }
}

fn decode_payload<T>(text: &str) -> Result<Option<T>, UpstreamError>
where
    T: DeserializeOwned,
{
    if text.trim().is_empty() {
        return Ok(None);
    }

    let value: serde_json::Value = serde_json::from_str(text)?;
    let is_empty = match &value {
        serde_json::Value::Null => true,
        serde_json::Value::Object(map) => map.is_empty(),
        _ => false,
    };
    if is_empty {
        return Ok(None);
    }

    Ok(Some(serde_json::from_value(value)?))
}
