mod clock;
mod config;
mod display;
mod fusion;
mod models;
mod remote;
mod sensors;
mod server;
mod store;
mod utils;

use log::{error, info};

use clock::SystemClock;
use config::MonitorConfig;
use display::{DisplayDriver, LcdDevice, LogDisplay};
use fusion::FusionLoop;
use remote::OpenWeatherClient;
use sensors::IioSensors;
use server::create_router;
use store::SnapshotStore;

async fn run_monitor(config: MonitorConfig) -> Result<(), Box<dyn std::error::Error>> {
    info!("Starting environmental monitor for {}", config.city_name);

    let store = SnapshotStore::new();

    // Subscribe before the first cycle so the display sees every snapshot
    let updates = store.subscribe();
    match &config.lcd_device {
        Some(path) => {
            info!("Driving character display at {}", path.display());
            tokio::spawn(DisplayDriver::new(LcdDevice::new(path.clone())).run(updates));
        }
        None => {
            info!("No LCD_DEVICE configured, display pages go to the log");
            tokio::spawn(DisplayDriver::new(LogDisplay).run(updates));
        }
    }

    let remote = OpenWeatherClient::new(
        config.api_base.clone(),
        config.api_key.clone(),
        config.remote_timeout,
    )?;
    let fusion = FusionLoop::new(
        IioSensors::new(&config.sensors, config.sensor_timeout),
        remote,
        SystemClock::new(config.utc_offset),
        config.city_name.clone(),
        store.clone(),
        config.utc_offset,
    );
    tokio::spawn(fusion.run(config.cycle_delay));

    let listener = tokio::net::TcpListener::bind(config.http_bind).await?;
    info!("Serving snapshots at http://{}/data", config.http_bind);
    axum::serve(listener, create_router(store, &config.static_dir)).await?;

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .format_timestamp_secs()
        .init();

    // Load configuration
    let config = match MonitorConfig::new() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    // Run until the server fails or Ctrl+C arrives
    tokio::select! {
        result = run_monitor(config) => {
            if let Err(e) = result {
                error!("Fatal error: {}", e);
                return Err(e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            info!("Program terminated by user. Exiting gracefully.");
        }
    }

    Ok(())
}
