pub mod iio;

use std::future::Future;

use thiserror::Error;

use crate::models::LocalReading;

pub use iio::IioSensors;

#[derive(Debug, Error)]
pub enum SensorError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("unexpected value {value:?} in {path}")]
    Parse { path: String, value: String },
    #[error("{path} did not answer within {millis} ms")]
    Timeout { path: String, millis: u128 },
}

/// Local sensors sampled once per fusion cycle.
///
/// Reads never fail as a whole: a sensor that cannot be read shows up as
/// `None` in the returned [`LocalReading`].
pub trait LocalSensors {
    fn read_local(&self) -> impl Future<Output = LocalReading> + Send;
}
