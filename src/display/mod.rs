pub mod pages;

use log::{debug, info, warn};
use std::future::Future;
use std::path::PathBuf;
use std::sync::Arc;

use thiserror::Error;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::watch;

use crate::models::Snapshot;

pub use pages::{render, Page, PageCycle, PAGE_COUNT};

/// Width of the 16x2 character display.
pub const LCD_COLUMNS: usize = 16;

#[derive(Debug, Error)]
pub enum DisplayError {
    #[error("display device {path}: {source}")]
    Device {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Two lines of display text, each cut to [`LCD_COLUMNS`] characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub top: String,
    pub bottom: String,
}

impl Frame {
    pub fn new(top: impl Into<String>, bottom: impl Into<String>) -> Self {
        Self {
            top: clip(top.into()),
            bottom: clip(bottom.into()),
        }
    }
}

fn clip(mut line: String) -> String {
    if let Some((cut, _)) = line.char_indices().nth(LCD_COLUMNS) {
        line.truncate(cut);
    }
    line
}

/// Output device for rendered frames.
///
/// Implementations must not block the runtime; slow devices are awaited.
pub trait CharDisplay {
    fn show(&mut self, frame: &Frame) -> impl Future<Output = Result<(), DisplayError>> + Send;
}

/// Linux `charlcd` device node (e.g. `/dev/lcd`)
///
/// A form feed clears the screen and homes the cursor, a newline moves to
/// the start of the second line. The device is opened per frame through
/// `tokio::fs`, so a stalled driver only delays the display task.
#[derive(Debug, Clone)]
pub struct LcdDevice {
    path: PathBuf,
}

impl LcdDevice {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

impl CharDisplay for LcdDevice {
    async fn show(&mut self, frame: &Frame) -> Result<(), DisplayError> {
        let device_error = |source| DisplayError::Device {
            path: self.path.display().to_string(),
            source,
        };
        let mut device = OpenOptions::new()
            .write(true)
            .open(&self.path)
            .await
            .map_err(device_error)?;
        device
            .write_all(format!("\x0c{}\n{}", frame.top, frame.bottom).as_bytes())
            .await
            .map_err(device_error)?;
        device.flush().await.map_err(device_error)
    }
}

/// Writes frames to the log when no display hardware is configured.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogDisplay;

impl CharDisplay for LogDisplay {
    async fn show(&mut self, frame: &Frame) -> Result<(), DisplayError> {
        info!(
            "LCD | {:<width$} | {:<width$} |",
            frame.top,
            frame.bottom,
            width = LCD_COLUMNS
        );
        Ok(())
    }
}

/// Consumer that shows one page per published snapshot
///
/// The page shown for a snapshot is the current position of the rotation;
/// the rotation then moves on by one, so consecutive snapshots walk through
/// all pages in order.
///
/// Updates arrive through a `watch` receiver, which only holds the latest
/// snapshot. If a device write outlasts a fusion cycle, the snapshots
/// published meanwhile collapse into one and the rotation advances once
/// for all of them.
pub struct DisplayDriver<D> {
    display: D,
    pages: PageCycle,
}

impl<D: CharDisplay> DisplayDriver<D> {
    pub fn new(display: D) -> Self {
        Self {
            display,
            pages: PageCycle::new(),
        }
    }

    /// Render and show the current page, then advance the rotation
    ///
    /// Device errors are logged; the rotation advances regardless.
    pub async fn on_snapshot(&mut self, snapshot: &Snapshot) -> Frame {
        let frame = render(snapshot, self.pages.current());
        debug!("Page {} -> {:?}", self.pages.index(), frame);
        if let Err(e) = self.display.show(&frame).await {
            warn!("Display update failed: {}", e);
        }
        self.pages.advance();
        frame
    }

    /// Follow the snapshot store until its publisher goes away
    pub async fn run(mut self, mut updates: watch::Receiver<Arc<Snapshot>>) {
        while updates.changed().await.is_ok() {
            let snapshot = updates.borrow_and_update().clone();
            self.on_snapshot(&snapshot).await;
        }
        info!("Snapshot store closed, display driver stopping");
    }
}
