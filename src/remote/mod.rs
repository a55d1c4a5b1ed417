pub mod openweather;

use std::future::Future;

use serde::Deserialize;
use thiserror::Error;

use crate::models::{AirQualityReport, WeatherReport};

pub use openweather::OpenWeatherClient;

/// Bodies this short cannot hold a useful JSON document.
pub const MIN_PAYLOAD_LEN: usize = 20;

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("server answered {0}")]
    Status(reqwest::StatusCode),
    #[error("bad request URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Remote weather and air-quality data.
///
/// Both lookups are infallible from the caller's point of view: any
/// failure (transport, status, timeout, unusable body) yields `None`.
pub trait RemoteSource {
    fn fetch_weather(&self, city: &str) -> impl Future<Output = Option<WeatherReport>> + Send;

    fn fetch_air_quality(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> impl Future<Output = Option<AirQualityReport>> + Send;
}

#[derive(Debug, Deserialize)]
struct WeatherPayload {
    main: Option<MainBlock>,
    coord: Option<CoordBlock>,
    name: Option<String>,
    dt: Option<i64>,
}

#[derive(Debug, Deserialize)]
struct MainBlock {
    pressure: Option<f32>,
}

#[derive(Debug, Deserialize)]
struct CoordBlock {
    lat: Option<f64>,
    lon: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct AirPayload {
    list: Option<Vec<AirEntry>>,
}

#[derive(Debug, Deserialize)]
struct AirEntry {
    components: Option<Components>,
}

#[derive(Debug, Deserialize)]
struct Components {
    pm2_5: Option<f32>,
}

/// Parse a current-weather response body.
///
/// Returns None for bodies of at most [`MIN_PAYLOAD_LEN`] bytes and for
/// anything that is not valid JSON of the expected shape. Fields missing
/// from an otherwise valid document are left as None.
pub fn parse_weather(body: &str) -> Option<WeatherReport> {
    if body.len() <= MIN_PAYLOAD_LEN {
        return None;
    }
    let payload: WeatherPayload = serde_json::from_str(body).ok()?;
    let coord = payload.coord.as_ref();

    Some(WeatherReport {
        pressure: payload.main.and_then(|m| m.pressure),
        latitude: coord.and_then(|c| c.lat),
        longitude: coord.and_then(|c| c.lon),
        city: payload.name,
        observed_at: payload.dt,
    })
}

/// Parse an air-pollution response body; PM2.5 comes from the first entry.
pub fn parse_air_quality(body: &str) -> Option<AirQualityReport> {
    if body.len() <= MIN_PAYLOAD_LEN {
        return None;
    }
    let payload: AirPayload = serde_json::from_str(body).ok()?;
    let pm25 = payload
        .list
        .and_then(|list| list.into_iter().next())
        .and_then(|entry| entry.components)
        .and_then(|c| c.pm2_5);

    Some(AirQualityReport { pm25 })
}

#[cfg(test)]
mod tests {
    use super::*;

    const WEATHER_BODY: &str = r#"{
        "coord": {"lon": 73.8553, "lat": 18.5196},
        "main": {"temp": 24.1, "pressure": 1009, "humidity": 60},
        "dt": 1717225200,
        "name": "Pune",
        "cod": 200
    }"#;

    #[test]
    fn weather_fields_are_extracted() {
        let report = parse_weather(WEATHER_BODY).unwrap();

        assert_eq!(report.pressure, Some(1009.0));
        assert_eq!(report.latitude, Some(18.5196));
        assert_eq!(report.longitude, Some(73.8553));
        assert_eq!(report.city.as_deref(), Some("Pune"));
        assert_eq!(report.observed_at, Some(1_717_225_200));
    }

    #[test]
    fn short_body_is_empty() {
        assert_eq!(parse_weather("{\"a\"}"), None);
        assert_eq!(parse_weather(""), None);
        assert_eq!(parse_air_quality("{}"), None);
    }

    #[test]
    fn malformed_json_is_empty() {
        assert_eq!(parse_weather("<html>502 Bad Gateway</html>"), None);
        assert_eq!(parse_weather(r#"{"main": {"pressure": "high"}, "name": "x"}"#), None);
    }

    #[test]
    fn incomplete_document_leaves_fields_unset() {
        let report = parse_weather(r#"{"cod": "404", "message": "city not found"}"#).unwrap();
        assert_eq!(report, WeatherReport::default());
        assert_eq!(report.coordinates(), (0.0, 0.0));
    }

    #[test]
    fn pm25_comes_from_first_entry() {
        let body = r#"{"coord":{"lon":73.85,"lat":18.52},"list":[
            {"main":{"aqi":2},"components":{"co":201.94,"pm2_5":15.2,"pm10":20.1},"dt":1717225200},
            {"main":{"aqi":3},"components":{"pm2_5":99.0},"dt":1717228800}
        ]}"#;
        assert_eq!(parse_air_quality(body).unwrap().pm25, Some(15.2));
    }

    #[test]
    fn empty_pollution_list_has_no_pm25() {
        let report = parse_air_quality(r#"{"coord":{"lon":0,"lat":0},"list":[]}"#).unwrap();
        assert_eq!(report.pm25, None);
    }
}
