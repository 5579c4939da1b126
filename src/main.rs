mod app;
mod color;
mod config;
mod data;
mod error;
mod state;
mod ui;

use std::path::Path;

use app::DataAnalysisApp;
use config::{AppConfig, CONFIG_FILE};
use eframe::egui;

fn main() -> eframe::Result {
    env_logger::init();

    let config = AppConfig::load_or_default(Path::new(CONFIG_FILE));

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1800.0, 900.0])
            .with_min_inner_size([800.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Data Analysis Tool",
        options,
        Box::new(|_cc| Ok(Box::new(DataAnalysisApp::new(config)))),
    )
}
