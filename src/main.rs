//! Player Market Explorer - interactive dashboard
//!
//! Filters the players file by country and position and shows market value
//! charts for the current selection.

use anyhow::{anyhow, Context, Result};
use eframe::egui;
use player_market_explorer::config::AppConfig;
use player_market_explorer::gui::ExplorerApp;
use player_market_explorer::logging;

fn main() -> Result<()> {
    let config = AppConfig::load_default_location().context("Failed to load configuration")?;
    logging::init(config.level_filter()?).context("Failed to initialise logging")?;

    // Configure native options
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([1100.0, 700.0])
            .with_title("Football Player Market Value Analysis"),
        ..Default::default()
    };

    // Run the application
    eframe::run_native(
        "Player Market Explorer",
        options,
        Box::new(|cc| Ok(Box::new(ExplorerApp::new(cc, config)))),
    )
    .map_err(|e| anyhow!("Dashboard failed: {}", e))
}
