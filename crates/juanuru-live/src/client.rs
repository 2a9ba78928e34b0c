use std::sync::Arc;
use std::time::Duration;

use juanuru_core::{LiveConfig, NetworkError, ReqwestErrorExt};
use reqwest::Client;
use url::Url;

use crate::retry::{with_retry, RetryConfig};
use crate::types::{LiveError, LiveReading};

/// HTTP client for the live data endpoint.
#[derive(Debug, Clone)]
pub struct LiveDataClient {
    client: Arc<Client>,
    endpoint: Url,
    require_success_status: bool,
    retry: RetryConfig,
}

impl LiveDataClient {
    /// Build a client from the `[live]` settings.
    ///
    /// # Errors
    /// Fails when the endpoint URL is malformed or the HTTP client cannot be built.
    pub fn new(config: &LiveConfig) -> Result<Self, LiveError> {
        let endpoint = Url::parse(&config.base_url)
            .and_then(|base| base.join(&config.endpoint_path))
            .map_err(|e| {
                NetworkError::InvalidRequest(format!(
                    "{}{}: {}",
                    config.base_url, config.endpoint_path, e
                ))
            })?;

        let mut builder = Client::builder();
        if let Some(secs) = config.request_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder.build().map_err(|e| e.into_network_error())?;

        Ok(Self {
            client: Arc::new(client),
            endpoint,
            require_success_status: config.require_success_status,
            retry: RetryConfig::new(config.max_retries, config.retry_delay_ms),
        })
    }

    /// Full request URL for a coordinate pair.
    pub fn url_for(&self, lat: f64, lon: f64) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("lat", &lat.to_string())
            .append_pair("lon", &lon.to_string());
        url
    }

    /// Fetch the current reading at `lat`/`lon`.
    ///
    /// # Errors
    /// `Network` when no response arrives, `HttpStatus` for a non-2xx answer
    /// (unless status checks are disabled), `Parse` when the body is not a reading.
    pub async fn fetch(&self, lat: f64, lon: f64) -> Result<LiveReading, LiveError> {
        let url = self.url_for(lat, lon);
        tracing::debug!("GET {}", url);

        let response = with_retry(&self.retry, || self.client.get(url.clone()).send())
            .await
            .map_err(|e| e.into_network_error())?;

        let status = response.status();
        if !status.is_success() {
            if self.require_success_status {
                return Err(LiveError::HttpStatus {
                    status: status.as_u16(),
                });
            }
            tracing::debug!("Ignoring status {} from live endpoint", status);
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| e.into_network_error())?;
        let reading: LiveReading = serde_json::from_slice(&body)?;

        tracing::debug!(
            "Live reading: temperature={:?} windspeed={:?}",
            reading.temperature,
            reading.wind_speed
        );
        Ok(reading)
    }
}
