use serde::Serialize;
use time::OffsetDateTime;

use crate::utils::{format_clock, format_timestamp, round_to, round_to_f64};

/// Timestamp text published when the local clock is not synchronized.
pub const TIME_ERROR: &str = "Time Error";

/// One pass over the local sensors. `None` marks a failed read.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LocalReading {
    pub temperature: Option<f32>,
    pub humidity: Option<f32>,
    pub gas_raw: Option<u16>,
    pub light_raw: Option<u16>,
}

/// Fields taken from a current-weather response.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeatherReport {
    pub pressure: Option<f32>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub city: Option<String>,
    pub observed_at: Option<i64>,
}

impl WeatherReport {
    /// Coordinates for the air-quality lookup, (0, 0) when absent.
    pub fn coordinates(&self) -> (f64, f64) {
        (
            self.latitude.unwrap_or_default(),
            self.longitude.unwrap_or_default(),
        )
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AirQualityReport {
    pub pm25: Option<f32>,
}

/// The fused reading of one cycle.
///
/// Every field that can go missing is an `Option`; the sentinel values of
/// the JSON contract are only applied in [`SnapshotJson`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub temperature: Option<f32>,
    pub humidity: Option<f32>,
    pub gas_raw: Option<u16>,
    pub light_raw: Option<u16>,
    pub pressure: Option<f32>,
    pub pm25: Option<f32>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub city: Option<String>,
    pub observed_at: Option<i64>,
    pub local_time: Option<OffsetDateTime>,
}

impl Snapshot {
    /// Assemble a snapshot from the results of one cycle.
    ///
    /// The coordinates are the ones the air-quality lookup was issued with,
    /// so `pm25` and `latitude`/`longitude` always belong together.
    pub fn fuse(
        local: LocalReading,
        weather: Option<WeatherReport>,
        air: Option<AirQualityReport>,
        local_time: Option<OffsetDateTime>,
    ) -> Self {
        let weather = weather.unwrap_or_default();
        let air = air.unwrap_or_default();

        Snapshot {
            temperature: local.temperature,
            humidity: local.humidity,
            gas_raw: local.gas_raw,
            light_raw: local.light_raw,
            pressure: weather.pressure,
            pm25: air.pm25,
            latitude: weather.latitude,
            longitude: weather.longitude,
            city: weather.city,
            observed_at: weather.observed_at,
            local_time,
        }
    }

    /// `DD-MM-YYYY HH:MM:SS`, or [`TIME_ERROR`] when the clock was unsynchronized.
    pub fn timestamp(&self) -> String {
        self.local_time
            .map(|t| format_timestamp(&t))
            .unwrap_or_else(|| TIME_ERROR.to_string())
    }

    /// `HH:MM:SS` for the clock page.
    pub fn clock(&self) -> Option<String> {
        self.local_time.map(|t| format_clock(&t))
    }

    pub fn city_name(&self) -> &str {
        self.city.as_deref().unwrap_or("")
    }
}

/// Wire form of a [`Snapshot`] served by `GET /data`.
///
/// Field order is the serialization order. Missing remote values become
/// `0`/`""`, an unsynchronized clock becomes `"Time Error"`, and an
/// unavailable temperature or humidity becomes `null`.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct SnapshotJson {
    pub temp: Option<f32>,
    pub hum: Option<f32>,
    pub pressure: f32,
    pub pm25: f32,
    pub co2: u16,
    pub ldr: u16,
    pub time: String,
    pub city: String,
    pub lat: f64,
    pub lon: f64,
}

impl From<&Snapshot> for SnapshotJson {
    fn from(snapshot: &Snapshot) -> Self {
        SnapshotJson {
            temp: snapshot.temperature.map(|t| round_to(t, 2)),
            hum: snapshot.humidity.map(|h| round_to(h, 2)),
            pressure: round_to(snapshot.pressure.unwrap_or_default(), 2),
            pm25: round_to(snapshot.pm25.unwrap_or_default(), 2),
            co2: snapshot.gas_raw.unwrap_or_default(),
            ldr: snapshot.light_raw.unwrap_or_default(),
            time: snapshot.timestamp(),
            city: snapshot.city_name().to_string(),
            lat: round_to_f64(snapshot.latitude.unwrap_or_default(), 6),
            lon: round_to_f64(snapshot.longitude.unwrap_or_default(), 6),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    fn weather() -> WeatherReport {
        WeatherReport {
            pressure: Some(1013.0),
            latitude: Some(12.34),
            longitude: Some(56.78),
            city: Some("Testville".to_string()),
            observed_at: Some(1_700_000_000),
        }
    }

    #[test]
    fn missing_weather_leaves_remote_fields_empty() {
        let snapshot = Snapshot::fuse(LocalReading::default(), None, None, None);
        let json = SnapshotJson::from(&snapshot);

        assert_eq!(json.pressure, 0.0);
        assert_eq!(json.pm25, 0.0);
        assert_eq!(json.city, "");
        assert_eq!(json.lat, 0.0);
        assert_eq!(json.lon, 0.0);
        assert_eq!(json.time, TIME_ERROR);
    }

    #[test]
    fn zero_pressure_is_distinct_from_missing_pressure() {
        let reported = Snapshot::fuse(
            LocalReading::default(),
            Some(WeatherReport {
                pressure: Some(0.0),
                ..weather()
            }),
            None,
            None,
        );
        let missing = Snapshot::fuse(LocalReading::default(), None, None, None);

        assert_eq!(reported.pressure, Some(0.0));
        assert_eq!(missing.pressure, None);
    }

    #[test]
    fn json_keys_match_contract() {
        let snapshot = Snapshot::fuse(
            LocalReading {
                temperature: Some(21.5),
                humidity: Some(40.0),
                gas_raw: Some(512),
                light_raw: Some(3000),
            },
            Some(weather()),
            Some(AirQualityReport { pm25: Some(15.2) }),
            Some(datetime!(2024-03-01 08:15:30 +05:30)),
        );
        let value = serde_json::to_value(SnapshotJson::from(&snapshot)).unwrap();
        let mut keys: Vec<&str> = value
            .as_object()
            .unwrap()
            .keys()
            .map(String::as_str)
            .collect();
        keys.sort_unstable();

        assert_eq!(
            keys,
            ["city", "co2", "hum", "lat", "ldr", "lon", "pm25", "pressure", "temp", "time"]
        );
        assert_eq!(value["time"], "01-03-2024 08:15:30");
        assert_eq!(value["co2"], 512);
        assert_eq!(value["ldr"], 3000);
    }

    #[test]
    fn unavailable_temperature_serializes_as_null() {
        let snapshot = Snapshot::fuse(LocalReading::default(), Some(weather()), None, None);
        let body = serde_json::to_string(&SnapshotJson::from(&snapshot)).unwrap();

        assert!(body.starts_with(r#"{"temp":null,"hum":null,"pressure":1013.0,"#));
    }

    #[test]
    fn coordinates_round_to_six_places() {
        let snapshot = Snapshot::fuse(
            LocalReading::default(),
            Some(WeatherReport {
                latitude: Some(12.345_678_91),
                longitude: Some(-56.000_000_4),
                ..weather()
            }),
            None,
            None,
        );
        let json = SnapshotJson::from(&snapshot);

        assert_eq!(json.lat, 12.345679);
        assert_eq!(json.lon, -56.0);
    }
}
