use crate::display::Frame;
use crate::models::Snapshot;

pub const PAGE_COUNT: usize = 6;

/// The views shown on the character display, in rotation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    TemperatureHumidity,
    AirQualityPressure,
    GasLight,
    Location,
    Coordinates,
    Clock,
}

impl Page {
    pub const ALL: [Page; PAGE_COUNT] = [
        Page::TemperatureHumidity,
        Page::AirQualityPressure,
        Page::GasLight,
        Page::Location,
        Page::Coordinates,
        Page::Clock,
    ];
}

/// Position in the page rotation. Starts at the first page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageCycle {
    index: usize,
}

impl PageCycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn current(&self) -> Page {
        Page::ALL[self.index]
    }

    pub fn advance(&mut self) {
        self.index = (self.index + 1) % PAGE_COUNT;
    }
}

/// Lay out one page of a snapshot as two display lines.
pub fn render(snapshot: &Snapshot, page: Page) -> Frame {
    match page {
        Page::TemperatureHumidity => Frame::new(
            format!("Temp: {} C", one_decimal(snapshot.temperature)),
            format!("Hum: {} %", one_decimal(snapshot.humidity)),
        ),
        Page::AirQualityPressure => Frame::new(
            format!("PM2.5: {:.1}", snapshot.pm25.unwrap_or_default()),
            format!("Press: {:.0}", snapshot.pressure.unwrap_or_default()),
        ),
        Page::GasLight => Frame::new(
            format!("CO2: {}", snapshot.gas_raw.unwrap_or_default()),
            format!("Light: {}", snapshot.light_raw.unwrap_or_default()),
        ),
        Page::Location => Frame::new("Location:", snapshot.city_name()),
        Page::Coordinates => Frame::new(
            format!("Lat: {:.4}", snapshot.latitude.unwrap_or_default()),
            format!("Lon: {:.4}", snapshot.longitude.unwrap_or_default()),
        ),
        Page::Clock => Frame::new(
            "Time:",
            snapshot.clock().unwrap_or_else(|| "Syncing...".to_string()),
        ),
    }
}

fn one_decimal(value: Option<f32>) -> String {
    value
        .map(|v| format!("{:.1}", v))
        .unwrap_or_else(|| "--".to_string())
}
