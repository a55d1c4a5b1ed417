use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;
use time::UtcOffset;
use url::Url;

const DEFAULT_BASE_URL: &str = "http://api.openweathermap.org/data/2.5";
const DEFAULT_CYCLE_DELAY_MS: u64 = 3000;
const DEFAULT_REMOTE_TIMEOUT_SECS: u64 = 10;
const DEFAULT_SENSOR_TIMEOUT_MS: u64 = 2000;
const DEFAULT_HTTP_BIND: &str = "0.0.0.0:80";
const DEFAULT_STATIC_DIR: &str = "./data";
const DEFAULT_UTC_OFFSET_SECS: i32 = 19800; // IST
const DEFAULT_DHT_IIO_DIR: &str = "/sys/bus/iio/devices/iio:device0";
const DEFAULT_ADC_IIO_DIR: &str = "/sys/bus/iio/devices/iio:device1";
const DEFAULT_GAS_ADC_CHANNEL: u8 = 6;
const DEFAULT_LIGHT_ADC_CHANNEL: u8 = 7;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} environment variable not set")]
    Missing(&'static str),
    #[error("invalid value {value:?} for {key}: {reason}")]
    Invalid {
        key: &'static str,
        value: String,
        reason: String,
    },
}

/// Where the local sensors live in sysfs.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorPaths {
    pub dht_dir: PathBuf,
    pub adc_dir: PathBuf,
    pub gas_channel: u8,
    pub light_channel: u8,
}

#[derive(Debug, Clone)]
pub struct MonitorConfig {
    pub api_key: String,
    pub city_name: String,
    pub api_base: Url,
    pub cycle_delay: Duration,
    pub remote_timeout: Duration,
    pub sensor_timeout: Duration,
    pub http_bind: SocketAddr,
    pub static_dir: PathBuf,
    pub utc_offset: UtcOffset,
    pub sensors: SensorPaths,
    pub lcd_device: Option<PathBuf>,
}

impl MonitorConfig {
    pub fn new() -> Result<Self, ConfigError> {
        // Load environment variables
        dotenv::dotenv().ok();

        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key/value source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Missing(key))
        };

        let api_key = required("OWM_API_KEY")?;
        let city_name = required("CITY_NAME")?;

        let base = lookup("OWM_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let api_base = Url::parse(base.trim_end_matches('/')).map_err(|e| ConfigError::Invalid {
            key: "OWM_BASE_URL",
            value: base.clone(),
            reason: e.to_string(),
        })?;
        if api_base.cannot_be_a_base() {
            return Err(ConfigError::Invalid {
                key: "OWM_BASE_URL",
                value: base,
                reason: "not a base URL".to_string(),
            });
        }

        let cycle_delay =
            Duration::from_millis(parse_or(&lookup, "CYCLE_DELAY_MS", DEFAULT_CYCLE_DELAY_MS)?);
        let remote_timeout = Duration::from_secs(parse_or(
            &lookup,
            "REMOTE_TIMEOUT_SECS",
            DEFAULT_REMOTE_TIMEOUT_SECS,
        )?);
        let sensor_timeout = Duration::from_millis(parse_or(
            &lookup,
            "SENSOR_TIMEOUT_MS",
            DEFAULT_SENSOR_TIMEOUT_MS,
        )?);
        let http_bind = parse_or(
            &lookup,
            "HTTP_BIND",
            SocketAddr::from_str(DEFAULT_HTTP_BIND).map_err(|e| ConfigError::Invalid {
                key: "HTTP_BIND",
                value: DEFAULT_HTTP_BIND.to_string(),
                reason: e.to_string(),
            })?,
        )?;

        let offset_secs = parse_or(&lookup, "UTC_OFFSET_SECS", DEFAULT_UTC_OFFSET_SECS)?;
        let utc_offset =
            UtcOffset::from_whole_seconds(offset_secs).map_err(|e| ConfigError::Invalid {
                key: "UTC_OFFSET_SECS",
                value: offset_secs.to_string(),
                reason: e.to_string(),
            })?;

        let sensors = SensorPaths {
            dht_dir: lookup("DHT_IIO_DIR")
                .unwrap_or_else(|| DEFAULT_DHT_IIO_DIR.to_string())
                .into(),
            adc_dir: lookup("ADC_IIO_DIR")
                .unwrap_or_else(|| DEFAULT_ADC_IIO_DIR.to_string())
                .into(),
            gas_channel: parse_or(&lookup, "GAS_ADC_CHANNEL", DEFAULT_GAS_ADC_CHANNEL)?,
            light_channel: parse_or(&lookup, "LIGHT_ADC_CHANNEL", DEFAULT_LIGHT_ADC_CHANNEL)?,
        };

        Ok(MonitorConfig {
            api_key,
            city_name,
            api_base,
            cycle_delay,
            remote_timeout,
            sensor_timeout,
            http_bind,
            static_dir: lookup("STATIC_DIR")
                .unwrap_or_else(|| DEFAULT_STATIC_DIR.to_string())
                .into(),
            utc_offset,
            sensors,
            lcd_device: lookup("LCD_DEVICE")
                .filter(|v| !v.trim().is_empty())
                .map(PathBuf::from),
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
            key,
            value: raw,
            reason: e.to_string(),
        }),
        None => Ok(default),
    }
}
