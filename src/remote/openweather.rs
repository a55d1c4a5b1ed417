/// OpenWeatherMap client for current weather and air pollution
use log::{debug, warn};
use std::time::Duration;
use url::Url;

use crate::models::{AirQualityReport, WeatherReport};
use crate::remote::{parse_air_quality, parse_weather, RemoteError, RemoteSource};

#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    http: reqwest::Client,
    base: Url,
    api_key: String,
}

impl OpenWeatherClient {
    /// Create a client whose every request is bounded by `timeout`
    ///
    /// # Arguments
    /// * `base` - API root, e.g. `http://api.openweathermap.org/data/2.5`
    /// * `api_key` - value sent as the `appid` query parameter
    /// * `timeout` - total time allowed per request, body included
    pub fn new(base: Url, api_key: String, timeout: Duration) -> Result<Self, RemoteError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(base, api_key, http))
    }

    pub fn with_client(base: Url, api_key: String, http: reqwest::Client) -> Self {
        Self {
            http,
            base,
            api_key,
        }
    }

    fn endpoint(&self, path: &str, params: &[(&str, &str)]) -> Result<Url, RemoteError> {
        let root = self.base.as_str().trim_end_matches('/');
        let mut url = Url::parse(&format!("{}/{}", root, path))?;
        url.query_pairs_mut()
            .extend_pairs(params)
            .append_pair("appid", &self.api_key);
        Ok(url)
    }

    async fn get_body(&self, url: Url) -> Result<String, RemoteError> {
        debug!("GET {}", url.path());
        let response = self.http.get(url).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(RemoteError::Status(status));
        }
        Ok(response.text().await?)
    }

    async fn fetch_body(&self, path: &str, params: &[(&str, &str)]) -> Option<String> {
        let result = match self.endpoint(path, params) {
            Ok(url) => self.get_body(url).await,
            Err(e) => Err(e),
        };
        match result {
            Ok(body) => Some(body),
            Err(e) => {
                warn!("{} lookup failed: {}", path, e);
                None
            }
        }
    }
}

impl RemoteSource for OpenWeatherClient {
    async fn fetch_weather(&self, city: &str) -> Option<WeatherReport> {
        let body = self
            .fetch_body("weather", &[("q", city), ("units", "metric")])
            .await?;
        let report = parse_weather(&body);
        if report.is_none() {
            warn!("Unusable weather payload ({} bytes)", body.len());
        }
        report
    }

    async fn fetch_air_quality(&self, latitude: f64, longitude: f64) -> Option<AirQualityReport> {
        let lat = latitude.to_string();
        let lon = longitude.to_string();
        let body = self
            .fetch_body("air_pollution", &[("lat", lat.as_str()), ("lon", lon.as_str())])
            .await?;
        let report = parse_air_quality(&body);
        if report.is_none() {
            warn!("Unusable air-pollution payload ({} bytes)", body.len());
        }
        report
    }
}
