/// The sampling and fusion cycle that produces snapshots
use log::info;
use std::fmt::Display;
use std::time::Duration;
use time::UtcOffset;
use tokio::time::sleep;

use crate::clock::Clock;
use crate::models::Snapshot;
use crate::remote::RemoteSource;
use crate::sensors::LocalSensors;
use crate::store::SnapshotStore;
use crate::utils::format_unix;

/// Producer side of the monitor
///
/// Each cycle reads the local sensors, fetches the weather for the
/// configured city, fetches air quality at the coordinates that came back,
/// stamps the result with local time and publishes it as one snapshot.
/// The steps run strictly in that order, so local values are as old as the
/// two remote round trips by the time they are published.
pub struct FusionLoop<S, R, C> {
    sensors: S,
    remote: R,
    clock: C,
    city: String,
    store: SnapshotStore,
    utc_offset: UtcOffset,
}

impl<S, R, C> FusionLoop<S, R, C>
where
    S: LocalSensors,
    R: RemoteSource,
    C: Clock,
{
    pub fn new(
        sensors: S,
        remote: R,
        clock: C,
        city: String,
        store: SnapshotStore,
        utc_offset: UtcOffset,
    ) -> Self {
        Self {
            sensors,
            remote,
            clock,
            city,
            store,
            utc_offset,
        }
    }

    /// Run one cycle and publish its snapshot
    pub async fn run_cycle(&self) {
        let local = self.sensors.read_local().await;
        let weather = self.remote.fetch_weather(&self.city).await;

        // Air quality is looked up even without weather data, at (0, 0).
        let (latitude, longitude) = weather
            .as_ref()
            .map(|w| w.coordinates())
            .unwrap_or_default();
        let air = self.remote.fetch_air_quality(latitude, longitude).await;

        let snapshot = Snapshot::fuse(local, weather, air, self.clock.now());
        self.log_summary(&snapshot);
        self.store.publish(snapshot);
    }

    /// Run cycles forever, sleeping `interval` between them
    pub async fn run(self, interval: Duration) {
        info!(
            "Starting fusion loop for {} (interval {} ms)",
            self.city,
            interval.as_millis()
        );
        loop {
            self.run_cycle().await;
            sleep(interval).await;
        }
    }

    fn log_summary(&self, snapshot: &Snapshot) {
        let city = snapshot.city.as_deref().unwrap_or("(no weather data)");
        info!("Snapshot for {} at {}:", city, snapshot.timestamp());
        info!(
            "  Coordinates: {:.6}, {:.6}",
            snapshot.latitude.unwrap_or_default(),
            snapshot.longitude.unwrap_or_default()
        );
        info!("  Temperature: {}", describe(snapshot.temperature, " °C"));
        info!("  Humidity: {}", describe(snapshot.humidity, " %"));
        info!("  Pressure: {}", describe(snapshot.pressure, " hPa"));
        info!("  PM2.5: {}", describe(snapshot.pm25, " µg/m³"));
        info!("  Gas (raw): {}", describe(snapshot.gas_raw, ""));
        info!("  Light (raw): {}", describe(snapshot.light_raw, ""));
        if let Some(observed) = snapshot
            .observed_at
            .and_then(|dt| format_unix(dt, self.utc_offset))
        {
            info!("  Weather observed: {}", observed);
        }
    }
}

fn describe<T: Display>(value: Option<T>, unit: &str) -> String {
    match value {
        Some(v) => format!("{}{}", v, unit),
        None => "unavailable".to_string(),
    }
}
