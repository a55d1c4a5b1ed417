/// Local sensor access through the Linux Industrial I/O sysfs interface
use log::{debug, warn};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::time::timeout;

use crate::config::SensorPaths;
use crate::models::LocalReading;
use crate::sensors::{LocalSensors, SensorError};

// IIO attribute names exposed by the dht11 driver (milli-units)
const DHT_TEMPERATURE_ATTR: &str = "in_temp_input";
const DHT_HUMIDITY_ATTR: &str = "in_humidityrelative_input";

/// DHT humidity/temperature sensor plus two raw ADC channels
///
/// The DHT driver performs a full bus transaction on every attribute read,
/// which can take a second or more and fails with EIO on a bad checksum.
/// Each DHT read is therefore bounded by `dht_timeout`. ADC reads return
/// raw counts and are not converted.
#[derive(Debug, Clone)]
pub struct IioSensors {
    dht_dir: PathBuf,
    gas_path: PathBuf,
    light_path: PathBuf,
    dht_timeout: Duration,
}

impl IioSensors {
    pub fn new(paths: &SensorPaths, dht_timeout: Duration) -> Self {
        Self {
            dht_dir: paths.dht_dir.clone(),
            gas_path: adc_channel_path(&paths.adc_dir, paths.gas_channel),
            light_path: adc_channel_path(&paths.adc_dir, paths.light_channel),
            dht_timeout,
        }
    }

    async fn read_dht(&self, attr: &str) -> Result<f32, SensorError> {
        let path = self.dht_dir.join(attr);
        let milli = match timeout(self.dht_timeout, read_integer(&path)).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(SensorError::Timeout {
                    path: path.display().to_string(),
                    millis: self.dht_timeout.as_millis(),
                })
            }
        };
        Ok(milli as f32 / 1000.0)
    }

    async fn read_adc(&self, path: &Path) -> Result<u16, SensorError> {
        let raw = read_integer(path).await?;
        u16::try_from(raw).map_err(|_| SensorError::Parse {
            path: path.display().to_string(),
            value: raw.to_string(),
        })
    }
}

impl LocalSensors for IioSensors {
    async fn read_local(&self) -> LocalReading {
        let temperature = self.read_dht(DHT_TEMPERATURE_ATTR).await;
        let humidity = self.read_dht(DHT_HUMIDITY_ATTR).await;
        let gas_raw = self.read_adc(&self.gas_path).await;
        let light_raw = self.read_adc(&self.light_path).await;

        let reading = LocalReading {
            temperature: available("temperature", temperature),
            humidity: available("humidity", humidity),
            gas_raw: available("gas", gas_raw),
            light_raw: available("light", light_raw),
        };
        debug!("Local reading: {:?}", reading);
        reading
    }
}

/// Path of the raw value attribute for one ADC channel
pub fn adc_channel_path(adc_dir: &Path, channel: u8) -> PathBuf {
    adc_dir.join(format!("in_voltage{}_raw", channel))
}

fn available<T>(what: &str, result: Result<T, SensorError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(e) => {
            warn!("{} unavailable: {}", what, e);
            None
        }
    }
}

async fn read_integer(path: &Path) -> Result<i64, SensorError> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| SensorError::Io {
            path: path.display().to_string(),
            source,
        })?;
    text.trim().parse().map_err(|_| SensorError::Parse {
        path: path.display().to_string(),
        value: text.trim().to_string(),
    })
}
