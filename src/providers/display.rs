use log::{info, warn};

use super::DisplaySurface;

/// Display surface for headless hosts: everything goes to the log.
#[derive(Debug, Default, Clone)]
pub struct LogDisplay;

impl DisplaySurface for LogDisplay {
    fn show_location(&self, text: &str) {
        info!("[location] {}", text);
    }

    fn show_last_updated(&self, text: &str) {
        info!("[location] {}", text);
    }

    fn show_traffic(&self, text: &str) {
        for line in text.lines() {
            info!("[traffic] {}", line);
        }
    }

    fn alert(&self, text: &str) {
        warn!("[alert] {}", text);
    }
}
