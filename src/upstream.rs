//! OpenWeather client: direct geocoding and current air pollution.
//!
//! Endpoints used:
//! - `/geo/1.0/direct?q={city}&appid=..` returns an array of matches, best first
//! - `/data/2.5/air_pollution?lat=..&lon=..&appid=..` returns `{list: [...]}`,
//!   a one-entry time series for "current"

use std::time::Duration;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::error::SmogError;
use crate::types::{AirPollutionResponse, Coordinates, GeocodeEntry, PollutionReading};

const GEOCODE_PATH: &str = "/geo/1.0/direct";
const AIR_POLLUTION_PATH: &str = "/data/2.5/air_pollution";

/// Source of geocoding and pollution data.
#[async_trait]
pub trait AirQualityApi: Send + Sync {
    /// First match for a free-text city name.
    async fn geocode(&self, city: &str) -> Result<Coordinates, SmogError>;

    /// Current reading at a point.
    async fn air_pollution(&self, coordinates: Coordinates) -> Result<PollutionReading, SmogError>;
}

#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl OpenWeatherClient {
    pub fn new(base_url: &str, api_key: String, timeout: Duration) -> Result<Self, SmogError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("smogcheck/", env!("CARGO_PKG_VERSION")))
            .pool_max_idle_per_host(4)
            .timeout(timeout)
            .build()
            .map_err(|e| SmogError::Config(format!("failed to build OpenWeather HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<T, SmogError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {} {:?}", url, query);

        // `without_url` keeps the appid out of error messages and logs
        let resp = self
            .client
            .get(&url)
            .query(query)
            .query(&[("appid", self.api_key.as_str())])
            .send()
            .await
            .map_err(|e| SmogError::Transport(e.without_url().to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!("OpenWeather {} returned {}", path, status);
            return Err(SmogError::upstream_status(
                status.as_u16(),
                body.chars().take(500).collect::<String>(),
            ));
        }

        resp.json::<T>().await.map_err(|e| {
            if e.is_decode() {
                SmogError::malformed(format!("undecodable {path} payload: {}", e.without_url()))
            } else {
                SmogError::Transport(e.without_url().to_string())
            }
        })
    }
}

#[async_trait]
impl AirQualityApi for OpenWeatherClient {
    async fn geocode(&self, city: &str) -> Result<Coordinates, SmogError> {
        let city = city.trim();
        if city.is_empty() {
            return Err(SmogError::Validation("Missing city in params".to_string()));
        }

        let matches: Vec<GeocodeEntry> = self
            .get_json(GEOCODE_PATH, &[("q", city.to_string())])
            .await?;

        matches
            .into_iter()
            .next()
            .ok_or_else(|| SmogError::malformed(format!("no geocoding match for {city:?}")))
    }

    async fn air_pollution(&self, coordinates: Coordinates) -> Result<PollutionReading, SmogError> {
        let payload: AirPollutionResponse = self
            .get_json(
                AIR_POLLUTION_PATH,
                &[
                    ("lat", coordinates.latitude.to_string()),
                    ("lon", coordinates.longitude.to_string()),
                ],
            )
            .await?;

        payload.first_reading()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_blank_city_fails_before_network() {
        // Port 9 (discard) is never contacted: validation short-circuits.
        let client =
            OpenWeatherClient::new("http://127.0.0.1:9", "key".into(), Duration::from_secs(1)).unwrap();
        for city in ["", "   "] {
            match client.geocode(city).await {
                Err(SmogError::Validation(msg)) => assert_eq!(msg, "Missing city in params"),
                other => panic!("expected validation error, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let client =
            OpenWeatherClient::new("http://example.test/", "key".into(), Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url, "http://example.test");
    }
}
