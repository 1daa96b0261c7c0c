mod app;
mod color;
mod config;
mod data;
mod pages;
mod state;
mod ui;

use anyhow::{anyhow, Context, Result};
use app::DashboardApp;
use config::DashboardConfig;
use data::cache::DatasetCache;
use eframe::egui;
use state::AppState;

fn main() -> Result<()> {
    env_logger::init();

    let config = DashboardConfig::from_env()?;
    let mut cache = DatasetCache::new(config);

    // Startup needs all four tables; nothing is shown on a partial load.
    let bundle = match cache.get_or_load() {
        Ok(bundle) => bundle,
        Err(e) => {
            log::error!("Failed to load datasets: {e}");
            return Err(e).context("loading datasets");
        }
    };
    let state = AppState::new(cache, bundle);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1200.0, 800.0])
            .with_min_inner_size([600.0, 400.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Bharat Herald – Newspaper Survival Analysis",
        options,
        Box::new(|_cc| Ok(Box::new(DashboardApp::new(state)))),
    )
    .map_err(|e| anyhow!("{e}"))
}
