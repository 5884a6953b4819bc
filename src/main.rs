mod app;
mod state;
mod ui;

use std::path::PathBuf;

use allotment_assistant::config::AppConfig;
use app::AllotmentApp;
use eframe::egui;
use state::AppState;

fn main() -> eframe::Result {
    env_logger::init();

    let config = AppConfig::load().unwrap_or_else(|e| {
        log::error!("{e}; falling back to defaults");
        AppConfig::default()
    });

    let mut state = AppState::new(config);
    match state.config.table_path(std::env::args_os().nth(1).map(PathBuf::from)) {
        Ok(path) => state.load_table(&path),
        Err(e) => log::info!("{e}; waiting for File → Open…"),
    }

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Medical College Allotment AI Assistant",
        options,
        Box::new(|_cc| Ok(Box::new(AllotmentApp::new(state)))),
    )
}
